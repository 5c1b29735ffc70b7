//! Fixed-point solver traits.

use faer::{Mat, MatRef};

use super::nonlinearity::Nonlinearity;
use crate::cancel::CancellationToken;
use crate::error::Result;

/// Parameters shared by both fixed-point schemes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointParams {
    /// Contrast function g.
    pub nonlinearity: Nonlinearity,
    /// Iteration budget; zero skips the update entirely.
    pub max_iterations: usize,
    /// Stop once the alignment change drops to or below this value.
    pub tolerance: f64,
}

/// How one fixed-point loop ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// Update steps executed.
    pub iterations: usize,
    /// Alignment change of the last step; infinite if no step ran.
    pub limit: f64,
    /// Whether `limit` reached the tolerance within the budget.
    pub converged: bool,
}

impl Convergence {
    pub(crate) fn new(iterations: usize, limit: f64, tolerance: f64) -> Self {
        Self {
            iterations,
            limit,
            converged: limit <= tolerance,
        }
    }
}

/// Output of a fixed-point solver.
#[derive(Debug, Clone)]
pub struct UnmixingEstimate {
    /// Components × components matrix with unit-norm rows.
    pub matrix: Mat<f64>,
    /// One entry per component for deflation, a single entry for the joint scheme.
    pub convergence: Vec<Convergence>,
}

impl UnmixingEstimate {
    /// Whether every loop converged.
    pub fn converged(&self) -> bool {
        self.convergence.iter().all(|c| c.converged)
    }

    /// Total update steps across all loops.
    pub fn total_iterations(&self) -> usize {
        self.convergence.iter().map(|c| c.iterations).sum()
    }
}

/// Trait for fixed-point unmixing estimators.
pub trait FixedPointSolver {
    /// Estimate the unmixing matrix.
    ///
    /// * `whitened` - components × samples whitened data
    /// * `initial` - components × components starting weights (read only)
    /// * `cancel` - polled between units of work
    fn solve(
        &self,
        whitened: MatRef<'_, f64>,
        initial: MatRef<'_, f64>,
        cancel: &CancellationToken,
    ) -> Result<UnmixingEstimate>;

    /// Short name used in log records.
    fn name(&self) -> &'static str;
}
