//! In-memory set of players opted into autohunt.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use zoohunt_domain::PlayerId;

/// Players currently opted into autohunt.
///
/// Mirrors the persisted `autohunt_enabled` flag; rebuilt from storage at
/// startup by [`super::AutoHuntScheduler::restore`].
#[derive(Debug, Default)]
pub struct AutoHuntRegistry {
    players: RwLock<HashSet<PlayerId>>,
}

impl AutoHuntRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the player was not already enabled.
    pub fn enable(&self, player_id: PlayerId) -> bool {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player_id)
    }

    /// Returns `true` if the player was enabled.
    pub fn disable(&self, player_id: PlayerId) -> bool {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&player_id)
    }

    /// Current members, sorted so tick order is stable.
    pub fn snapshot(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self
            .players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        players.sort();
        players
    }

    pub fn len(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_and_disable_are_idempotent() {
        let registry = AutoHuntRegistry::new();
        let player_id = PlayerId::new();

        assert!(registry.enable(player_id));
        assert!(!registry.enable(player_id));
        assert!(registry.contains(player_id));
        assert_eq!(registry.len(), 1);

        assert!(registry.disable(player_id));
        assert!(!registry.disable(player_id));
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let registry = AutoHuntRegistry::new();
        let a = PlayerId::new();
        let b = PlayerId::new();
        registry.enable(a);
        registry.enable(b);

        let snapshot = registry.snapshot();
        registry.disable(a);

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(registry.snapshot(), vec![b]);
    }
}
