//! Per-issue mutual exclusion.

use crate::lifecycle::domain::IssueId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async lock per issue.
///
/// Commands against one issue are serialised; commands against different
/// issues never contend beyond the brief registry lookup. Entries nobody
/// holds or awaits are pruned on each acquisition, so the registry tracks
/// only issues with commands in flight.
#[derive(Debug, Default)]
pub struct IssueLocks {
    locks: Mutex<HashMap<IssueId, Arc<AsyncMutex<()>>>>,
}

impl IssueLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `issue_id`.
    ///
    /// The section is released when the returned guard is dropped.
    pub async fn acquire(&self, issue_id: IssueId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Clones happen under the registry lock, so a count of one is final.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(issue_id).or_default())
        };
        lock.lock_owned().await
    }
}
