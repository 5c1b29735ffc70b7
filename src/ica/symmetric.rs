//! Symmetric (parallel) FastICA: all components jointly.
//!
//! # Algorithm
//!
//! ```text
//! W ← (W·Wᵗ)^(-1/2) · W            with W = Winit
//! repeat while limit > tol and it < max_iter:
//!     wx   = W · X1
//!     gwx  = g(wx)
//!     v1   = gwx · X1ᵗ · n
//!     W1   = v1 − diag(mean_j g'(wx)) · W
//!     W1  ← (W1·W1ᵗ)^(-1/2) · W1
//!     limit = max_r | |(W1·Wᵗ)_rr| − 1 |
//!     W   ← W1
//! ```
//!
//! `(M·Mᵗ)^(-1/2) · M` is computed from the SVD `M = U·diag(s)·Vᵗ` as
//! `U·diag(1/s)·Uᵗ·M`.
//!
//! `v1` is scaled by the sample count rather than divided by it. The
//! deflation update takes a plain sample mean instead; the two normalizations
//! differ and both are kept as is.
//!
//! Within one iteration the rows of `W1` are independent of each other until
//! the joint re-orthogonalization, so they are computed in parallel under the
//! `parallel` feature.

use faer::{Mat, MatRef};

use super::traits::{Convergence, FixedPointParams, FixedPointSolver, UnmixingEstimate};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::linalg::{map_indices, symmetric_decorrelation};

const STAGE: &str = "symmetric decorrelation";

/// Joint fixed-point solver with symmetric re-orthogonalization.
#[derive(Debug, Clone, Copy)]
pub struct SymmetricSolver {
    params: FixedPointParams,
}

impl SymmetricSolver {
    /// Create a symmetric solver.
    pub fn new(params: FixedPointParams) -> Self {
        Self { params }
    }

    /// One joint update from the snapshot `w`, before re-orthogonalization.
    fn step(&self, w: MatRef<'_, f64>, x1: MatRef<'_, f64>) -> Mat<f64> {
        let g = self.params.nonlinearity;
        let (k, n_samples) = (x1.nrows(), x1.ncols());
        let n = n_samples as f64;

        let rows: Vec<Vec<f64>> = map_indices(k, |r| {
            let mut gwx = Vec::with_capacity(n_samples);
            let mut derivative_sum = 0.0;
            for j in 0..n_samples {
                let wx: f64 = (0..k).map(|t| w[(r, t)] * x1[(t, j)]).sum();
                let gu = g.g(wx);
                derivative_sum += g.derivative(wx, gu);
                gwx.push(gu);
            }
            let derivative_mean = derivative_sum / n;

            (0..k)
                .map(|c| {
                    let v1: f64 = (0..n_samples).map(|j| gwx[j] * x1[(c, j)]).sum::<f64>() * n;
                    v1 - derivative_mean * w[(r, c)]
                })
                .collect()
        });

        Mat::from_fn(k, k, |r, c| rows[r][c])
    }
}

/// `max_r | |Σ_c a[r,c]·b[r,c]| − 1 |`.
fn alignment_change(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> f64 {
    (0..a.nrows())
        .map(|r| {
            let d: f64 = (0..a.ncols()).map(|c| a[(r, c)] * b[(r, c)]).sum();
            (d.abs() - 1.0).abs()
        })
        .fold(0.0, f64::max)
}

impl FixedPointSolver for SymmetricSolver {
    fn solve(
        &self,
        whitened: MatRef<'_, f64>,
        initial: MatRef<'_, f64>,
        cancel: &CancellationToken,
    ) -> Result<UnmixingEstimate> {
        let k = whitened.nrows();
        if initial.nrows() != k || initial.ncols() != k {
            return Err(Error::ShapeMismatch {
                expected: format!("{k}x{k} initial weights"),
                actual: format!("{}x{}", initial.nrows(), initial.ncols()),
            });
        }
        if whitened.ncols() == 0 {
            return Err(Error::EmptyInput);
        }

        let mut w = symmetric_decorrelation(initial, STAGE)?;
        let mut limit = f64::INFINITY;
        let mut iterations = 0;

        while limit > self.params.tolerance && iterations < self.params.max_iterations {
            cancel.check()?;

            let w1 = self.step(w.as_ref(), whitened);
            let w1 = symmetric_decorrelation(w1.as_ref(), STAGE)?;
            limit = alignment_change(w1.as_ref(), w.as_ref());
            w = w1;
            iterations += 1;
            tracing::trace!(iterations, limit, "symmetric step");
        }

        let outcome = Convergence::new(iterations, limit, self.params.tolerance);
        if outcome.converged {
            tracing::debug!(iterations, limit, components = k, "symmetric run converged");
        } else {
            tracing::info!(
                iterations,
                limit,
                components = k,
                "symmetric run did not converge; keeping last estimate"
            );
        }

        Ok(UnmixingEstimate {
            matrix: w,
            convergence: vec![outcome],
        })
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
