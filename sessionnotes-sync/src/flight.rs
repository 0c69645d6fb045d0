//! Single-slot in-flight flag shared by the pipeline and the delete flow.

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a one-request-at-a-time slot until dropped.
///
/// Dropping covers abandoned futures too, so the slot never stays taken after
/// its request is gone.
pub(crate) struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    /// Take the slot, or `None` if another request holds it.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
