//! Dense linear-algebra helpers on top of `faer`.
//!
//! Tabular data arrives as `ndarray` arrays; every factorization runs on
//! `faer` matrices. Helpers here convert between the two and wrap the SVD so
//! that rank deficiency surfaces as [`Error::NumericalInstability`] instead of
//! leaking `inf`/`NaN` into later stages.

use faer::{Mat, MatRef};
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Singular values at or below `RANK_TOLERANCE * s_max` count as zero.
pub(crate) const RANK_TOLERANCE: f64 = 1e-12;

pub(crate) fn array_to_faer(array: ArrayView2<'_, f64>) -> Mat<f64> {
    Mat::from_fn(array.nrows(), array.ncols(), |i, j| array[[i, j]])
}

pub(crate) fn faer_to_array(mat: MatRef<'_, f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}

/// `U · diag(s) · Vᵗ` with singular values sorted in decreasing order.
pub(crate) struct Svd {
    pub u: Mat<f64>,
    pub s: Vec<f64>,
    pub v: Mat<f64>,
}

pub(crate) fn svd(mat: MatRef<'_, f64>, stage: &'static str) -> Result<Svd> {
    let decomposition = mat
        .svd()
        .map_err(|e| Error::unstable(stage, format!("SVD failed to converge: {e:?}")))?;

    let values = decomposition.S().column_vector();
    let u = decomposition.U();
    let v = decomposition.V();
    let rank = mat.nrows().min(mat.ncols());

    let mut order: Vec<usize> = (0..rank).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let s = order.iter().map(|&i| values[i]).collect();
    let u = Mat::from_fn(u.nrows(), rank, |i, j| u[(i, order[j])]);
    let v = Mat::from_fn(v.nrows(), rank, |i, j| v[(i, order[j])]);

    Ok(Svd { u, s, v })
}

/// Fail if any of `values` (sorted, decreasing) is zero relative to the largest.
pub(crate) fn check_spectrum(values: &[f64], stage: &'static str) -> Result<()> {
    let largest = match values.first() {
        Some(&s) => s,
        None => return Err(Error::EmptyInput),
    };
    if !largest.is_finite() || largest <= 0.0 {
        return Err(Error::unstable(
            stage,
            format!("largest singular value is {largest}"),
        ));
    }
    for (i, &s) in values.iter().enumerate() {
        if !s.is_finite() || s <= RANK_TOLERANCE * largest {
            return Err(Error::unstable(
                stage,
                format!("singular value {i} is {s:e} (largest {largest:e}); matrix is rank deficient"),
            ));
        }
    }
    Ok(())
}

/// Symmetric decorrelation `U · diag(1/s) · Uᵗ · W`, i.e. `(W·Wᵗ)^(-1/2) · W`.
///
/// The rows of the result are orthonormal.
pub(crate) fn symmetric_decorrelation(w: MatRef<'_, f64>, stage: &'static str) -> Result<Mat<f64>> {
    let Svd { u, s, .. } = svd(w, stage)?;
    check_spectrum(&s, stage)?;

    let scaled = Mat::from_fn(u.nrows(), u.ncols(), |i, j| u[(i, j)] / s[j]);
    let left = scaled.as_ref() * u.transpose();
    Ok(left.as_ref() * w)
}

/// Inverse of a square matrix via its SVD, `V · diag(1/s) · Uᵗ`.
pub(crate) fn inverse(mat: MatRef<'_, f64>, stage: &'static str) -> Result<Mat<f64>> {
    if mat.nrows() != mat.ncols() {
        return Err(Error::ShapeMismatch {
            expected: "square matrix".to_string(),
            actual: format!("{}x{}", mat.nrows(), mat.ncols()),
        });
    }
    let Svd { u, s, v } = svd(mat, stage)?;
    check_spectrum(&s, stage)?;

    let scaled = Mat::from_fn(v.nrows(), v.ncols(), |i, j| v[(i, j)] / s[j]);
    Ok(scaled.as_ref() * u.transpose())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit Euclidean norm. Only a zero or non-finite norm is rejected.
pub(crate) fn normalize(mut v: Vec<f64>, stage: &'static str) -> Result<Vec<f64>> {
    let norm = norm(&v);
    if !norm.is_finite() || norm <= 0.0 {
        return Err(Error::unstable(
            stage,
            format!("cannot normalize a vector of norm {norm:e}"),
        ));
    }
    v.iter_mut().for_each(|x| *x /= norm);
    Ok(v)
}

/// Evaluate `f` for every index in `0..n`, in parallel with the `parallel` feature.
pub(crate) fn map_indices<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..n).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}
