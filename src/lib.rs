//! # unmix
//!
//! Independent component analysis (FastICA): whitening through an SVD of the
//! covariance matrix, then a fixed-point search for maximally non-Gaussian
//! directions, either one component at a time (deflation) or jointly
//! (symmetric orthogonalization).
//!
//! Data is passed as `ndarray` arrays or an [`ExampleTable`]; the fitted
//! matrices are `faer` matrices.
//!
//! Enable the `parallel` feature to spread per-row arithmetic over rayon's pool.

pub mod cancel;
pub mod data;
/// Error types used across `unmix`.
pub mod error;
pub mod ica;
pub(crate) mod linalg;
pub mod metrics;

#[cfg(test)]
mod ica_tests;

pub use cancel::CancellationToken;
pub use data::{Attribute, AttributeKind, ExampleTable};
pub use error::{Error, Result};
pub use ica::{
    AlgorithmType, Convergence, FastIca, FixedPointSolver, IcaConfig, IcaModel, Nonlinearity,
    NonlinearityKind,
};
pub use metrics::{amari_index, correlation, excess_kurtosis, max_abs_correlations, negentropy};
