//! Final matrices and their application to new data.
//!
//! ```text
//! W = a · K                       (components × attributes)
//! A = Wᵗ · (W · Wᵗ)⁻¹             (attributes × components)
//! ```
//!
//! A row `x` maps to component space as `W · (x − means)` and back as
//! `A · s + means`. `A · W` is the orthogonal projector onto the retained
//! principal subspace, so reconstruction is exact when every attribute
//! gets a component.

use faer::{Mat, MatRef};
use ndarray::{Array1, Array2, ArrayView2};

use super::preprocess::normalize_rows;
use super::traits::{Convergence, UnmixingEstimate};
use super::whiten::variance_ratio;
use crate::data::ExampleTable;
use crate::error::{Error, Result};
use crate::linalg::{array_to_faer, faer_to_array, inverse};

/// Combines whitening and the solver estimate into an [`IcaModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAssembler;

impl ModelAssembler {
    /// Assemble the final whitening, unmixing and mixing matrices.
    ///
    /// Fails with [`Error::NumericalInstability`] when `W · Wᵗ` is singular.
    pub fn assemble(
        &self,
        whitening: Mat<f64>,
        estimate: UnmixingEstimate,
        means: Array1<f64>,
        variances: Vec<f64>,
        row_norm: bool,
    ) -> Result<IcaModel> {
        let a = estimate.matrix.as_ref();
        if a.ncols() != whitening.nrows() || a.nrows() != a.ncols() {
            return Err(Error::ShapeMismatch {
                expected: format!("{0}x{0} unmixing estimate", whitening.nrows()),
                actual: format!("{}x{}", a.nrows(), a.ncols()),
            });
        }
        if means.len() != whitening.ncols() {
            return Err(Error::DimensionMismatch {
                expected: whitening.ncols(),
                found: means.len(),
            });
        }

        let unmixing = a * whitening.as_ref();
        let gram = unmixing.as_ref() * unmixing.transpose();
        let gram_inv = inverse(gram.as_ref(), "mixing")?;
        let mixing = unmixing.transpose() * gram_inv.as_ref();

        Ok(IcaModel {
            whitening,
            unmixing,
            mixing,
            means,
            variances,
            row_norm,
            attribute_names: None,
            convergence: estimate.convergence,
        })
    }
}

/// A fitted independent component analysis.
#[derive(Debug, Clone)]
pub struct IcaModel {
    whitening: Mat<f64>,
    unmixing: Mat<f64>,
    mixing: Mat<f64>,
    means: Array1<f64>,
    variances: Vec<f64>,
    row_norm: bool,
    attribute_names: Option<Vec<String>>,
    convergence: Vec<Convergence>,
}

impl IcaModel {
    pub(crate) fn with_attribute_names(mut self, names: Vec<String>) -> Self {
        self.attribute_names = Some(names);
        self
    }

    /// Number of extracted components.
    pub fn n_components(&self) -> usize {
        self.unmixing.nrows()
    }

    /// Number of input attributes.
    pub fn n_attributes(&self) -> usize {
        self.unmixing.ncols()
    }

    /// Whitening matrix K (components × attributes).
    pub fn whitening(&self) -> MatRef<'_, f64> {
        self.whitening.as_ref()
    }

    /// Unmixing matrix W = a·K (components × attributes).
    pub fn unmixing(&self) -> MatRef<'_, f64> {
        self.unmixing.as_ref()
    }

    /// Mixing matrix A (attributes × components).
    pub fn mixing(&self) -> MatRef<'_, f64> {
        self.mixing.as_ref()
    }

    /// Column means removed before projection.
    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    /// Whether rows are RMS-scaled before projection.
    pub fn row_norm(&self) -> bool {
        self.row_norm
    }

    /// Names of the training attributes, when fitted from a table.
    pub fn attribute_names(&self) -> Option<&[String]> {
        self.attribute_names.as_deref()
    }

    /// Per-loop convergence outcomes of the solver.
    pub fn convergence(&self) -> &[Convergence] {
        &self.convergence
    }

    /// Whether every solver loop reached the tolerance.
    pub fn converged(&self) -> bool {
        self.convergence.iter().all(|c| c.converged)
    }

    /// Share of training variance along each principal direction.
    pub fn explained_variance_ratio(&self) -> Vec<f64> {
        variance_ratio(&self.variances)
    }

    /// Center (and row-scale) new `samples × attributes` data as in training.
    fn prepare(&self, data: ArrayView2<'_, f64>) -> Result<Mat<f64>> {
        if data.ncols() != self.n_attributes() {
            return Err(Error::DimensionMismatch {
                expected: self.n_attributes(),
                found: data.ncols(),
            });
        }
        let mut centered = &data - &self.means;
        if self.row_norm {
            normalize_rows(&mut centered)?;
        }
        Ok(array_to_faer(centered.view()))
    }

    /// Project rows onto the whitened principal subspace (`samples × components`).
    pub fn whiten(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let x = self.prepare(data)?;
        Ok(faer_to_array((x.as_ref() * self.whitening.transpose()).as_ref()))
    }

    /// Project rows into component space (`samples × components`).
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let x = self.prepare(data)?;
        Ok(faer_to_array((x.as_ref() * self.unmixing.transpose()).as_ref()))
    }

    /// Map component scores back to attribute space (`samples × attributes`).
    pub fn inverse_transform(&self, sources: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if sources.ncols() != self.n_components() {
            return Err(Error::DimensionMismatch {
                expected: self.n_components(),
                found: sources.ncols(),
            });
        }
        let s = array_to_faer(sources);
        let reconstructed = faer_to_array((s.as_ref() * self.mixing.transpose()).as_ref());
        Ok(reconstructed + &self.means)
    }

    /// Transform a table into a new table of component columns `ic_1 … ic_k`.
    pub fn apply(&self, table: &ExampleTable) -> Result<ExampleTable> {
        if let Some(expected) = &self.attribute_names {
            let actual = table.attribute_names();
            if &actual != expected {
                return Err(Error::ShapeMismatch {
                    expected: expected.join(", "),
                    actual: actual.join(", "),
                });
            }
        }
        let values = self.transform(table.numeric_values()?)?;
        let names = (1..=self.n_components()).map(|i| format!("ic_{i}"));
        ExampleTable::from_numeric(names, values)
    }
}
