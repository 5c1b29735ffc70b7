//! Separation quality metrics.
//!
//! Measures for judging how well estimated components match known sources,
//! and how non-Gaussian a signal is.
//!
//! # Metrics Overview
//!
//! | Metric | Range | Best | Use |
//! |--------|-------|------|-----|
//! | [`correlation`] | [-1, 1] | ±1 | Component vs. known source |
//! | [`max_abs_correlations`] | [0, 1] | 1 | Best match for every source |
//! | [`amari_index`] | [0, 1] | 0 | Unmixing · true mixing vs. a scaled permutation |
//! | [`excess_kurtosis`] | [-2, ∞) | far from 0 | Non-Gaussianity (4th moment) |
//! | [`negentropy`] | [0, ∞) | large | Non-Gaussianity (logcosh approximation) |
//!
//! ICA recovers sources only up to order, sign and scale, so every metric
//! here is invariant to those.
//!
//! # References
//!
//! - Amari, Cichocki, Yang (1996). "A new learning algorithm for blind signal separation"
//! - Hyvärinen & Oja (2000). "Independent component analysis: algorithms and applications"

use faer::MatRef;
use ndarray::ArrayView2;

/// Pearson correlation between two equally long signals.
///
/// Returns 0.0 when lengths differ, the input is empty, or a signal is constant.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// For each column of `sources`, the largest |correlation| with any column of `components`.
///
/// Both arrays are `samples × columns`.
pub fn max_abs_correlations(components: ArrayView2<'_, f64>, sources: ArrayView2<'_, f64>) -> Vec<f64> {
    if components.nrows() != sources.nrows() {
        return vec![0.0; sources.ncols()];
    }
    let comps: Vec<Vec<f64>> = components.columns().into_iter().map(|c| c.to_vec()).collect();
    sources
        .columns()
        .into_iter()
        .map(|s| {
            let s = s.to_vec();
            comps
                .iter()
                .map(|c| correlation(c, &s).abs())
                .fold(0.0, f64::max)
        })
        .collect()
}

/// Excess kurtosis `E[z⁴] − 3` of the standardized signal.
///
/// Zero for a Gaussian, −1.2 for uniform, −2 for a symmetric binary signal.
pub fn excess_kurtosis(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if var <= 0.0 {
        return 0.0;
    }
    let m4 = x.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;
    m4 / (var * var) - 3.0
}

/// Negentropy approximation `(E[G(z)] − E[G(ν)])²` with `G(u) = log cosh(u)`.
///
/// `z` is the standardized signal and `ν` a standard Gaussian, for which
/// `E[log cosh ν] ≈ 0.374567`.
pub fn negentropy(x: &[f64]) -> f64 {
    const GAUSSIAN_LOGCOSH: f64 = 0.374_567_207_5;

    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let sd = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if sd <= 0.0 {
        return 0.0;
    }
    let expected = x
        .iter()
        .map(|v| ((v - mean) / sd).cosh().ln())
        .sum::<f64>()
        / n;
    (expected - GAUSSIAN_LOGCOSH).powi(2)
}

/// Amari index of a square performance matrix `P = W · A_true`.
///
/// ```text
/// d(P) = 1/(2k(k−1)) · [ Σ_i (Σ_j |p_ij| / max_j |p_ij| − 1)
///                      + Σ_j (Σ_i |p_ij| / max_i |p_ij| − 1) ]
/// ```
///
/// Zero iff `P` is a scaled permutation, i.e. separation is perfect.
pub fn amari_index(p: MatRef<'_, f64>) -> f64 {
    let k = p.nrows();
    if k != p.ncols() || k < 2 {
        return 0.0;
    }

    let mut rows = 0.0;
    for i in 0..k {
        let max = (0..k).map(|j| p[(i, j)].abs()).fold(0.0, f64::max);
        if max > 0.0 {
            rows += (0..k).map(|j| p[(i, j)].abs()).sum::<f64>() / max - 1.0;
        }
    }
    let mut cols = 0.0;
    for j in 0..k {
        let max = (0..k).map(|i| p[(i, j)].abs()).fold(0.0, f64::max);
        if max > 0.0 {
            cols += (0..k).map(|i| p[(i, j)].abs()).sum::<f64>() / max - 1.0;
        }
    }
    (rows + cols) / (2.0 * k as f64 * (k as f64 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;
    use ndarray::Array2;

    #[test]
    fn test_correlation_perfect_and_sign() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let c = [-1.0, -2.0, -3.0, -4.0];
        assert!((correlation(&a, &b) - 1.0).abs() < 1e-12);
        assert!((correlation(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_degenerate() {
        assert_eq!(correlation(&[1.0, 1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(correlation(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(correlation(&[], &[]), 0.0);
    }

    #[test]
    fn test_max_abs_correlations_permuted() {
        let sources = Array2::from_shape_fn((50, 2), |(i, j)| {
            if j == 0 {
                (i as f64 * 0.3).sin()
            } else {
                (i as f64 * 0.11) % 1.0
            }
        });
        // Swapped and sign-flipped copies.
        let comps = Array2::from_shape_fn((50, 2), |(i, j)| -sources[[i, 1 - j]]);
        let best = max_abs_correlations(comps.view(), sources.view());
        assert!(best.iter().all(|&c| (c - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_kurtosis_binary_signal() {
        let x: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((excess_kurtosis(&x) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_negentropy_non_negative() {
        let x: Vec<f64> = (0..200).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(negentropy(&x) > 0.0);
        assert_eq!(negentropy(&[3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_amari_index_permutation_is_zero() {
        let p = Mat::from_fn(3, 3, |i, j| {
            [[0.0, 2.0, 0.0], [0.0, 0.0, -1.0], [0.5, 0.0, 0.0]][i][j]
        });
        assert!(amari_index(p.as_ref()).abs() < 1e-12);

        let mixed = Mat::from_fn(2, 2, |_, _| 1.0);
        assert!((amari_index(mixed.as_ref()) - 1.0).abs() < 1e-12);
    }
}
