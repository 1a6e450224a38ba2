//! Single in-flight refresh guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks whether a refresh is outstanding.
///
/// Clones share the same flag, so the panel and the worker fetching data can
/// both observe it.
#[derive(Debug, Clone, Default)]
pub struct RefreshGuard {
    in_flight: Arc<AtomicBool>,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard. None while another refresh is outstanding.
    pub fn try_begin(&self) -> Option<RefreshSubscription> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshSubscription {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Handle for one outstanding refresh. Dropping it releases the guard.
#[derive(Debug)]
pub struct RefreshSubscription {
    in_flight: Arc<AtomicBool>,
}

impl Drop for RefreshSubscription {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
