//! Deflationary FastICA: one component at a time.
//!
//! # Algorithm
//!
//! For component `i`, starting from row `i` of the initial weights:
//!
//! ```text
//! w  ← normalize(Winit[i]);  w ← normalize(w − Σ_{u<i} (w·W[u]) W[u])
//! repeat while limit > tol and it < max_iter:
//!     wx  = wᵗ X1
//!     w1  = mean_j(X1[:, j] · g(wx_j)) − mean_j(g'(wx_j)) · w
//!     w1  ← normalize(w1 − Σ_{u<i} (w1·W[u]) W[u])
//!     limit = | |w1·w| − 1 |
//!     w  ← w1
//! W[i] ← w
//! ```
//!
//! Each component depends on all rows committed before it, so the outer
//! loop is sequential. The sample reductions inside one step are not, and
//! run in parallel under the `parallel` feature.

use faer::{Mat, MatRef};

use super::traits::{Convergence, FixedPointParams, FixedPointSolver, UnmixingEstimate};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::linalg::{dot, map_indices, norm, normalize, RANK_TOLERANCE};

const STAGE: &str = "deflation";

/// Sequential fixed-point solver with explicit decorrelation.
#[derive(Debug, Clone, Copy)]
pub struct DeflationSolver {
    params: FixedPointParams,
}

impl DeflationSolver {
    /// Create a deflation solver.
    pub fn new(params: FixedPointParams) -> Self {
        Self { params }
    }

    /// One fixed-point step for `w`; returns the unnormalized, undecorrelated update.
    fn step(&self, w: &[f64], x1: MatRef<'_, f64>) -> Vec<f64> {
        let g = self.params.nonlinearity;
        let n = x1.ncols() as f64;

        let wx: Vec<f64> = map_indices(x1.ncols(), |j| {
            (0..x1.nrows()).map(|r| w[r] * x1[(r, j)]).sum::<f64>()
        });
        let gwx: Vec<f64> = wx.iter().map(|&u| g.g(u)).collect();
        let mean_derivative = wx
            .iter()
            .zip(&gwx)
            .map(|(&u, &gu)| g.derivative(u, gu))
            .sum::<f64>()
            / n;

        map_indices(x1.nrows(), |r| {
            let mean: f64 = (0..x1.ncols()).map(|j| x1[(r, j)] * gwx[j]).sum::<f64>() / n;
            mean - mean_derivative * w[r]
        })
    }
}

/// Remove from `w` its projection onto each of `rows`.
fn decorrelate(w: Vec<f64>, rows: &[Vec<f64>]) -> Vec<f64> {
    if rows.is_empty() {
        return w;
    }
    let mut projection = vec![0.0; w.len()];
    for row in rows {
        let k = dot(&w, row);
        for (p, r) in projection.iter_mut().zip(row) {
            *p += k * r;
        }
    }
    w.iter().zip(&projection).map(|(a, p)| a - p).collect()
}

/// Decorrelate `w` against `rows` and normalize the remainder.
///
/// Fails when the projection cancels `w` down to rounding noise.
fn orthonormalize(w: Vec<f64>, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let before = norm(&w);
    let residual = decorrelate(w, rows);
    let after = norm(&residual);
    if after <= RANK_TOLERANCE * before {
        return Err(Error::unstable(
            STAGE,
            format!("vector of norm {before:e} lies in the span of earlier components"),
        ));
    }
    normalize(residual, STAGE)
}

impl FixedPointSolver for DeflationSolver {
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

        let mut committed: Vec<Vec<f64>> = Vec::with_capacity(k);
        let mut convergence = Vec::with_capacity(k);

        for i in 0..k {
            cancel.check()?;

            let seed: Vec<f64> = (0..k).map(|c| initial[(i, c)]).collect();
            let mut w = orthonormalize(normalize(seed, STAGE)?, &committed)?;

            let mut limit = f64::INFINITY;
            let mut iterations = 0;
            while limit > self.params.tolerance && iterations < self.params.max_iterations {
                let w1 = self.step(&w, whitened);
                let w1 = orthonormalize(w1, &committed)?;
                limit = (dot(&w1, &w).abs() - 1.0).abs();
                w = w1;
                iterations += 1;
                tracing::trace!(component = i, iterations, limit, "deflation step");
            }

            let outcome = Convergence::new(iterations, limit, self.params.tolerance);
            if outcome.converged {
                tracing::debug!(component = i, iterations, limit, "component converged");
            } else {
                tracing::info!(
                    component = i,
                    iterations,
                    limit,
                    "component did not converge; keeping last estimate"
                );
            }
            convergence.push(outcome);
            committed.push(w);
        }

        let matrix = Mat::from_fn(k, k, |i, j| committed[i][j]);
        Ok(UnmixingEstimate {
            matrix,
            convergence,
        })
    }

    fn name(&self) -> &'static str {
        "deflation"
    }
}
