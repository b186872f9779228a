//! Cooperative cancellation for blocking operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation token shared between a caller and an in-flight operation.
///
/// Cloning is cheap; all clones observe the same flag. The remote lookup in
/// [`crate::ops::pin`] checks the token around each network probe, so firing
/// the token from another thread aborts the resolution at the next probe
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, un-fired token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
