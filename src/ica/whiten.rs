//! PCA whitening via an SVD of the covariance matrix.
//!
//! ```text
//! X  = centeredᵗ               (attributes × samples)
//! V  = X · Xᵗ / n              (attributes × attributes)
//! V  = U · diag(s) · Uᵗ        (SVD of a symmetric PSD matrix)
//! K  = (diag(1/√s) · Uᵗ)[..k]  (k × attributes)
//! X1 = K · X                   (k × samples)
//! ```
//!
//! The rows of `X1` are uncorrelated with unit variance: `X1·X1ᵗ/n = I_k`.
//!
//! Every attribute must vary: a zero-variance column is rejected whatever `k`
//! is. Beyond that only the `k` retained singular values must be non-zero,
//! so collinear attributes can still be reduced to fewer components.

use faer::{Mat, MatRef};
use ndarray::ArrayView2;

use crate::error::{Error, Result};
use crate::linalg::{array_to_faer, check_spectrum, svd, RANK_TOLERANCE};

/// Share of the total of `variances` carried by each entry.
pub(crate) fn variance_ratio(variances: &[f64]) -> Vec<f64> {
    let total: f64 = variances.iter().sum();
    if total <= 0.0 {
        return vec![0.0; variances.len()];
    }
    variances.iter().map(|v| v / total).collect()
}

/// Fail if an attribute's variance is zero relative to the largest one.
fn check_attribute_variances(cov: MatRef<'_, f64>) -> Result<()> {
    let largest = (0..cov.nrows()).map(|i| cov[(i, i)]).fold(0.0, f64::max);
    for i in 0..cov.nrows() {
        let variance = cov[(i, i)];
        if !variance.is_finite() || variance <= RANK_TOLERANCE * largest {
            return Err(Error::unstable(
                "whitening",
                format!("attribute {i} has variance {variance:e} (largest {largest:e})"),
            ));
        }
    }
    Ok(())
}

/// Whitening matrix and whitened training data.
#[derive(Debug, Clone)]
pub struct Whitening {
    k: Mat<f64>,
    data: Mat<f64>,
    variances: Vec<f64>,
}

impl Whitening {
    /// Whitening matrix K (components × attributes).
    pub fn matrix(&self) -> MatRef<'_, f64> {
        self.k.as_ref()
    }

    /// Whitened data X1 (components × samples).
    pub fn data(&self) -> MatRef<'_, f64> {
        self.data.as_ref()
    }

    /// Number of retained components.
    pub fn n_components(&self) -> usize {
        self.k.nrows()
    }

    /// All singular values of the covariance matrix, decreasing.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Share of total variance carried by each principal direction.
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        variance_ratio(&self.variances)
    }

    pub(crate) fn into_parts(self) -> (Mat<f64>, Vec<f64>) {
        (self.k, self.variances)
    }
}

/// Projects centered data onto the top-k principal directions with unit variance.
#[derive(Debug, Clone, Copy)]
pub struct Whitener {
    n_components: usize,
}

impl Whitener {
    /// Create a whitener retaining `n_components` directions.
    pub fn new(n_components: usize) -> Self {
        Self { n_components }
    }

    /// Whiten centered `samples × attributes` data.
    ///
    /// Fails with [`Error::NumericalInstability`] when an attribute is constant
    /// or a retained direction has (near) zero variance.
    pub fn whiten(&self, centered: ArrayView2<'_, f64>) -> Result<Whitening> {
        let (n_samples, n_attributes) = centered.dim();
        if n_samples == 0 || n_attributes == 0 {
            return Err(Error::EmptyInput);
        }
        let k = self.n_components;
        if k == 0 || k > n_attributes {
            return Err(Error::InvalidComponentCount {
                requested: k,
                n_attributes,
            });
        }

        let x = array_to_faer(centered.t());
        let xxt = x.as_ref() * x.transpose();
        let n = n_samples as f64;
        let cov = Mat::from_fn(n_attributes, n_attributes, |i, j| xxt[(i, j)] / n);

        check_attribute_variances(cov.as_ref())?;
        let decomposition = svd(cov.as_ref(), "whitening")?;
        check_spectrum(&decomposition.s[..k], "whitening")?;

        let u = decomposition.u.as_ref();
        let s = &decomposition.s;
        let whitening = Mat::from_fn(k, n_attributes, |i, j| u[(j, i)] / s[i].sqrt());

        let data = whitening.as_ref() * x.as_ref();
        tracing::debug!(
            n_samples,
            n_attributes,
            n_components = k,
            "whitened input"
        );

        Ok(Whitening {
            k: whitening,
            data,
            variances: decomposition.s,
        })
    }
}
