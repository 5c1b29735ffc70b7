//! Estimator configuration.

use std::fmt;
use std::str::FromStr;

use super::nonlinearity::Nonlinearity;
use super::traits::FixedPointParams;
use crate::error::{Error, Result};

/// Which fixed-point scheme estimates the unmixing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmType {
    /// One component at a time, decorrelated against earlier ones.
    #[default]
    Deflation,
    /// All components jointly, symmetrically re-orthogonalized each iteration.
    Parallel,
}

impl FromStr for AlgorithmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deflation" => Ok(AlgorithmType::Deflation),
            "parallel" | "symmetric" => Ok(AlgorithmType::Parallel),
            _ => Err(Error::InvalidParameter {
                name: "algorithm_type",
                message: "expected 'deflation' or 'parallel'",
            }),
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmType::Deflation => write!(f, "deflation"),
            AlgorithmType::Parallel => write!(f, "parallel"),
        }
    }
}

/// Contrast function selector; `alpha` lives on [`IcaConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonlinearityKind {
    /// tanh(αu).
    #[default]
    LogCosh,
    /// u·exp(−u²/2).
    Exp,
}

impl FromStr for NonlinearityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logcosh" => Ok(NonlinearityKind::LogCosh),
            "exp" => Ok(NonlinearityKind::Exp),
            _ => Err(Error::InvalidParameter {
                name: "function",
                message: "expected 'logcosh' or 'exp'",
            }),
        }
    }
}

impl fmt::Display for NonlinearityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonlinearityKind::LogCosh => write!(f, "logcosh"),
            NonlinearityKind::Exp => write!(f, "exp"),
        }
    }
}

/// FastICA configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IcaConfig {
    /// Components to extract; `None` means one per attribute.
    pub n_components: Option<usize>,
    /// Fixed-point scheme.
    pub algorithm: AlgorithmType,
    /// Contrast function.
    pub nonlinearity: NonlinearityKind,
    /// Steepness of `logcosh`, in [1, 2].
    pub alpha: f64,
    /// Scale each centered row by its root-mean-square.
    pub row_norm: bool,
    /// Iteration budget per component (deflation) or per run (parallel).
    pub max_iterations: usize,
    /// Convergence threshold on the alignment change.
    pub tolerance: f64,
    /// Seed for the initial weights; `None` draws from the thread generator.
    pub seed: Option<u64>,
}

impl Default for IcaConfig {
    fn default() -> Self {
        Self {
            n_components: None,
            algorithm: AlgorithmType::Deflation,
            nonlinearity: NonlinearityKind::LogCosh,
            alpha: 1.0,
            row_norm: false,
            max_iterations: 200,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

impl IcaConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of components.
    pub fn with_n_components(mut self, n: usize) -> Self {
        self.n_components = Some(n);
        self
    }

    /// Set the fixed-point scheme.
    pub fn with_algorithm(mut self, algorithm: AlgorithmType) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the contrast function.
    pub fn with_nonlinearity(mut self, nonlinearity: NonlinearityKind) -> Self {
        self.nonlinearity = nonlinearity;
        self
    }

    /// Set the `logcosh` steepness.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Enable or disable row normalization.
    pub fn with_row_norm(mut self, row_norm: bool) -> Self {
        self.row_norm = row_norm;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the seed from a signed value; negative values (conventionally `-1`)
    /// select the process-wide generator.
    pub fn with_random_seed(mut self, seed: i64) -> Self {
        self.seed = u64::try_from(seed).ok();
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.n_components == Some(0) {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        if !(1.0..=2.0).contains(&self.alpha) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must lie in [1.0, 2.0]",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be a positive finite number",
            });
        }
        Ok(())
    }

    /// Number of components for data with `n_attributes` columns.
    ///
    /// Requests above the attribute count are clamped with a warning.
    pub fn resolve_components(&self, n_attributes: usize) -> Result<usize> {
        let requested = self.n_components.unwrap_or(n_attributes);
        if requested == 0 || n_attributes == 0 {
            return Err(Error::InvalidComponentCount {
                requested,
                n_attributes,
            });
        }
        if requested > n_attributes {
            tracing::warn!(
                requested,
                n_attributes,
                "more components requested than attributes; clamping"
            );
            return Ok(n_attributes);
        }
        Ok(requested)
    }

    /// The contrast function with its steepness applied.
    pub fn contrast(&self) -> Nonlinearity {
        match self.nonlinearity {
            NonlinearityKind::LogCosh => Nonlinearity::LogCosh { alpha: self.alpha },
            NonlinearityKind::Exp => Nonlinearity::Exp,
        }
    }

    /// Solver parameters derived from this configuration.
    pub fn fixed_point_params(&self) -> FixedPointParams {
        FixedPointParams {
            nonlinearity: self.contrast(),
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}
