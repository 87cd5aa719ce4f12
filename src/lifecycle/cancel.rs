//! Cancellation for asynchronous disposal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag used to abort a running
/// [`dispose_async`](crate::lifecycle::LifecycleController::dispose_async)
///
/// All clones share one flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
