//! Contrast functions for the fixed-point update.
//!
//! | Name | g(u) | g'(u) |
//! |------|------|-------|
//! | logcosh | tanh(αu) | α(1 − tanh²(αu)) |
//! | exp | u·exp(−u²/2) | (1 − u²)·exp(−u²/2) |
//!
//! `logcosh` is the general-purpose choice; `exp` is more robust for highly
//! super-Gaussian sources.

/// The function g applied pointwise to projections `wᵗx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Nonlinearity {
    /// g(u) = tanh(αu), with α in [1, 2].
    LogCosh {
        /// Steepness.
        alpha: f64,
    },
    /// g(u) = u·exp(−u²/2).
    Exp,
}

impl Nonlinearity {
    /// g(u).
    pub fn g(&self, u: f64) -> f64 {
        match *self {
            Nonlinearity::LogCosh { alpha } => (alpha * u).tanh(),
            Nonlinearity::Exp => u * (-u * u / 2.0).exp(),
        }
    }

    /// g'(u), given the projection `u` and the already evaluated `gu = g(u)`.
    ///
    /// `logcosh` differentiates from `gu`, `exp` from `u`.
    pub fn derivative(&self, u: f64, gu: f64) -> f64 {
        match *self {
            Nonlinearity::LogCosh { alpha } => alpha * (1.0 - gu * gu),
            Nonlinearity::Exp => (1.0 - u * u) * (-u * u / 2.0).exp(),
        }
    }
}
