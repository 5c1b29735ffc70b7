//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// A stop flag shared between the caller and a running fit.
///
/// Solvers poll it between units of work: once per component for deflation,
/// once per iteration for the symmetric scheme. A cancelled fit returns
/// [`Error::Cancelled`] and keeps nothing.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stopped: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Every clone observes it.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// `Err(Error::Cancelled)` once a stop was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(Error::Cancelled));
    }
}
