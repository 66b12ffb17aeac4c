//! Per-collection-name serialization of check-then-mutate sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Map of collection name to an async lock. Entries are held weakly and pruned
/// once every guard for a name is dropped.
#[derive(Default)]
pub struct CollectionLocks {
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl CollectionLocks {
    const PRUNE_ABOVE: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds `name`, then returns the guard.
    pub async fn acquire(&self, name: &str) -> OwnedMutexGuard<()> {
        self.handle(name).lock_owned().await
    }

    fn handle(&self, name: &str) -> Arc<AsyncMutex<()>> {
        // The map only holds weak refs, so a poisoned guard leaves nothing torn.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        if locks.len() > Self::PRUNE_ABOVE {
            locks.retain(|_, weak| weak.strong_count() > 0);
        }
        if let Some(existing) = locks.get(name).and_then(Weak::upgrade) {
            return existing;
        }

        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(name.to_string(), Arc::downgrade(&lock));
        lock
    }

    #[cfg(test)]
    fn live(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}
