//! Connected-client counter.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of currently connected clients.
///
/// Independent of the message store's lock: presence and chat content have no
/// ordering relationship.
#[derive(Debug, Default)]
pub struct PresenceCounter {
    count: AtomicUsize,
}

impl PresenceCounter {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connect. Returns the new count.
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    /// Record a disconnect. Returns the new count.
    ///
    /// A no-op at zero, so a late or duplicated disconnect notification
    /// cannot wrap the counter.
    pub fn decrement(&self) -> usize {
        match self.count.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)) {
            Ok(previous) => previous - 1,
            Err(_) => 0,
        }
    }

    /// Current count.
    pub fn value(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}
