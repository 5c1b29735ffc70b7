//! Independent component analysis via FastICA.
//!
//! ICA models observations as a linear mix of statistically independent,
//! non-Gaussian sources:
//!
//! ```text
//! x = A · s        estimate W ≈ A⁻¹ so that  ŝ = W · x
//! ```
//!
//! Sources are identifiable only up to order, sign and scale.
//!
//! ## Pipeline
//!
//! 1. [`Preprocessor`]: subtract column means, optionally RMS-scale rows
//! 2. [`Whitener`]: SVD of the covariance; project onto the top-k principal
//!    directions with unit variance
//! 3. A [`FixedPointSolver`] maximizes non-Gaussianity in the whitened space:
//!    - [`DeflationSolver`]: one component at a time, each decorrelated from
//!      the ones already found (Gram–Schmidt)
//!    - [`SymmetricSolver`]: all components jointly, re-orthogonalized
//!      symmetrically after every update
//! 4. [`ModelAssembler`]: `W = a · K`, `A = Wᵗ (W Wᵗ)⁻¹`
//!
//! ## Choosing a scheme
//!
//! | Scheme | Order dependence | Errors | Parallelism |
//! |--------|------------------|--------|-------------|
//! | Deflation | later components inherit earlier errors | accumulate | per-step reductions |
//! | Parallel | none | spread evenly | rows of each update |
//!
//! ## Contrast functions
//!
//! [`Nonlinearity::LogCosh`] (`tanh(αu)`) is a good default.
//! [`Nonlinearity::Exp`] (`u·exp(−u²/2)`) is more robust when sources are
//! highly super-Gaussian or outliers are present.
//!
//! ## Failure modes
//!
//! - **Rank deficiency**: a constant column, or collinear attributes inside
//!   the retained subspace, make whitening impossible; reported as
//!   [`Error::NumericalInstability`](crate::Error::NumericalInstability)
//! - **Non-convergence**: not an error; see [`IcaModel::converged`]
//! - **Gaussian sources**: more than one Gaussian source cannot be separated
//!
//! # References
//!
//! - Hyvärinen (1999). "Fast and robust fixed-point algorithms for independent component analysis"
//! - Hyvärinen & Oja (2000). "Independent component analysis: algorithms and applications"

mod config;
mod deflation;
mod fastica;
mod model;
mod nonlinearity;
mod preprocess;
mod symmetric;
mod traits;
mod whiten;

pub use config::{AlgorithmType, IcaConfig, NonlinearityKind};
pub use deflation::DeflationSolver;
pub use fastica::{initial_weights, FastIca};
pub use model::{IcaModel, ModelAssembler};
pub use nonlinearity::Nonlinearity;
pub use preprocess::{center, Preprocessed, Preprocessor};
pub use symmetric::SymmetricSolver;
pub use traits::{Convergence, FixedPointParams, FixedPointSolver, UnmixingEstimate};
pub use whiten::{Whitener, Whitening};
