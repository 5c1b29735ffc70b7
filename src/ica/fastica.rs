//! The FastICA estimator: preprocessing, whitening, fixed point, assembly.

use faer::Mat;
use ndarray::ArrayView2;
use rand::prelude::*;
use rand_distr::StandardNormal;

use super::config::{AlgorithmType, IcaConfig};
use super::deflation::DeflationSolver;
use super::model::{IcaModel, ModelAssembler};
use super::preprocess::Preprocessor;
use super::symmetric::SymmetricSolver;
use super::traits::{FixedPointParams, FixedPointSolver};
use super::whiten::Whitener;
use crate::cancel::CancellationToken;
use crate::data::ExampleTable;
use crate::error::{Error, Result};

impl AlgorithmType {
    /// The solver implementing this scheme.
    pub fn solver(self, params: FixedPointParams) -> Box<dyn FixedPointSolver + Send + Sync> {
        match self {
            AlgorithmType::Deflation => Box::new(DeflationSolver::new(params)),
            AlgorithmType::Parallel => Box::new(SymmetricSolver::new(params)),
        }
    }
}

/// Standard-normal `k × k` starting weights, drawn row by row.
///
/// The same generator state always yields the same matrix.
pub fn initial_weights<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Mat<f64> {
    let draws: Vec<f64> = (0..k * k).map(|_| rng.sample(StandardNormal)).collect();
    Mat::from_fn(k, k, |i, j| draws[i * k + j])
}

/// FastICA estimator.
///
/// ```rust
/// use ndarray::Array2;
/// use unmix::{AlgorithmType, FastIca, IcaConfig};
///
/// let data = Array2::from_shape_fn((200, 2), |(i, j)| {
///     let t = i as f64;
///     let square = (t * 0.3).sin().signum();
///     let saw = (t * 0.17) % 1.0 - 0.5;
///     if j == 0 { square + 0.4 * saw } else { 0.5 * square - saw }
/// });
///
/// let model = FastIca::new(
///     IcaConfig::new()
///         .with_algorithm(AlgorithmType::Deflation)
///         .with_seed(7),
/// )
/// .fit_array(data.view())
/// .unwrap();
///
/// let sources = model.transform(data.view()).unwrap();
/// assert_eq!(sources.dim(), (200, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FastIca {
    config: IcaConfig,
}

impl FastIca {
    /// Create an estimator from a configuration.
    pub fn new(config: IcaConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &IcaConfig {
        &self.config
    }

    /// Fit on an all-numeric table; the model remembers the attribute names.
    pub fn fit(&self, table: &ExampleTable) -> Result<IcaModel> {
        let values = table.numeric_values()?;
        let model = self.fit_array(values)?;
        Ok(model.with_attribute_names(table.attribute_names()))
    }

    /// Fit on a `samples × attributes` array.
    pub fn fit_array(&self, data: ArrayView2<'_, f64>) -> Result<IcaModel> {
        self.fit_cancellable(data, &CancellationToken::new())
    }

    /// Fit, polling `cancel` between units of solver work.
    pub fn fit_cancellable(
        &self,
        data: ArrayView2<'_, f64>,
        cancel: &CancellationToken,
    ) -> Result<IcaModel> {
        let mut rng: Box<dyn RngCore> = match self.config.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with(data, &mut rng, cancel)
    }

    /// Fit with an explicit random generator for the initial weights.
    pub fn fit_with<R: Rng + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<IcaModel> {
        self.config.validate()?;
        let (n_samples, n_attributes) = data.dim();
        if n_samples == 0 || n_attributes == 0 {
            return Err(Error::EmptyInput);
        }
        let k = self.config.resolve_components(n_attributes)?;

        let pre = Preprocessor::new(self.config.row_norm).process(data)?;
        let whitening = Whitener::new(k).whiten(pre.data.view())?;

        let initial = initial_weights(k, rng);
        let solver = self.config.algorithm.solver(self.config.fixed_point_params());
        tracing::debug!(
            solver = solver.name(),
            n_samples,
            n_attributes,
            n_components = k,
            "estimating unmixing matrix"
        );
        let estimate = solver.solve(whitening.data(), initial.as_ref(), cancel)?;

        let (k_matrix, variances) = whitening.into_parts();
        ModelAssembler.assemble(k_matrix, estimate, pre.means, variances, self.config.row_norm)
    }
}
