//! Centering and optional row normalization.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{Error, Result};
use crate::linalg::RANK_TOLERANCE;

/// Centered data together with the column means that were removed.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Samples × attributes, zero column means (before row scaling).
    pub data: Array2<f64>,
    /// Per-attribute means, needed to project and reconstruct new rows.
    pub means: Array1<f64>,
}

/// Column centering with optional per-row scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor {
    row_norm: bool,
}

impl Preprocessor {
    /// Create a preprocessor.
    pub fn new(row_norm: bool) -> Self {
        Self { row_norm }
    }

    /// Center every column and, if enabled, scale every row.
    pub fn process(&self, data: ArrayView2<'_, f64>) -> Result<Preprocessed> {
        let (mut centered, means) = center(data)?;
        if self.row_norm {
            normalize_rows(&mut centered)?;
        }
        Ok(Preprocessed {
            data: centered,
            means,
        })
    }
}

/// Subtract the arithmetic mean of each column.
pub fn center(data: ArrayView2<'_, f64>) -> Result<(Array2<f64>, Array1<f64>)> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let means = data.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
    let centered = &data - &means;
    Ok((centered, means))
}

/// Divide each row by `sqrt(Σ row²) / max(1, attributes − 1)`.
///
/// A row whose scale is zero relative to the largest row scale is an error.
pub(crate) fn normalize_rows(data: &mut Array2<f64>) -> Result<()> {
    let divisor = data.ncols().saturating_sub(1).max(1) as f64;
    let scales: Vec<f64> = data
        .axis_iter(Axis(0))
        .map(|row| row.dot(&row).sqrt() / divisor)
        .collect();
    let largest = scales.iter().copied().fold(0.0, f64::max);

    for (i, (mut row, &scale)) in data.axis_iter_mut(Axis(0)).zip(&scales).enumerate() {
        if !scale.is_finite() || scale <= RANK_TOLERANCE * largest {
            return Err(Error::unstable(
                "row normalization",
                format!("row {i} has scale {scale:e} (largest {largest:e})"),
            ));
        }
        row.mapv_inplace(|x| x / scale);
    }
    Ok(())
}
