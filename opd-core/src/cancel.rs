//! Cancellation scopes that tie outstanding requests to the view that issued them.
//!
//! A view owns one [`CancelScope`] per request it has in flight. The request
//! carries a [`CancelToken`]. Dropping or replacing the scope cancels the
//! token: the worker skips cancelled commands, and the view ignores any
//! response whose token does not belong to its current scope.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct CancelScope {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            scope_id: self.id,
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// True if `token` was issued by this scope and the scope is still live.
    pub fn owns(&self, token: &CancelToken) -> bool {
        token.scope_id == self.id && !self.is_cancelled()
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle carried alongside a request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    scope_id: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn scope_id(&self) -> u64 {
        self.scope_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
