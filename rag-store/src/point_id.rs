//! Collision-free point identifiers.
//!
//! Ids are strictly increasing `u64`s. The counter is seeded from wall-clock
//! milliseconds scaled by 1000, so ids stay time-ordered across restarts while
//! up to 1000 ids per millisecond can be issued without touching the next tick.
//!
//! Uniqueness holds per generator, and one generator lives in each store
//! instance. Two processes writing the same collection share no counter and
//! can issue the same id within one millisecond, so a collection must have a
//! single writing process.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free, strictly increasing id source shared by all writers of a store.
///
/// Not coordinated across processes; see the module docs.
#[derive(Debug, Default)]
pub struct PointIdGenerator {
    last: AtomicU64,
}

impl PointIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id: `max(last + 1, now_ms * 1000)`.
    pub fn next_id(&self) -> u64 {
        let floor = now_millis().saturating_mul(1000);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = floor.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
