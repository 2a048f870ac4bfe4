//! Per-player exclusive sections.
//!
//! Every read-modify-commit of one player's state runs while holding that
//! player's lock. Players never share a lock, so work for different players
//! proceeds in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use zoohunt_domain::PlayerId;

/// Lock table keyed by player id.
#[derive(Default)]
pub struct PlayerLocks {
    locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `player_id`'s state.
    ///
    /// The guard releases the lock on drop.
    pub async fn acquire(&self, player_id: PlayerId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard is not held across the await
        let lock = self
            .locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop entries that no task holds or waits on, returning how many went.
    ///
    /// Every holder and waiter keeps a clone of the entry's `Arc`, so a strong
    /// count of one means the table owns the only reference. `acquire` clones
    /// under the shard lock that `retain` also takes.
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }

    /// Number of players with a live entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
