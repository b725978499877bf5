use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-session mutual exclusion for load-modify-save cycles.
///
/// Requests for different sessions never contend; requests for the same
/// session run one after another while a guard is held. Entries only leave
/// the table when idle, so a waiter never ends up on a detached mutex.
#[derive(Debug, Default, Clone)]
pub struct SessionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the entry for `session_id` unless a guard or waiter still holds it.
    ///
    /// Returns whether the entry was removed. Call after the caller's own guard
    /// is dropped.
    pub fn release_idle(&self, session_id: &str) -> bool {
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
