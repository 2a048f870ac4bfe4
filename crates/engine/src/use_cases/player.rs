//! Player lifecycle and read-only views.

use std::sync::Arc;

use zoohunt_domain::{AchievementRecord, Player, PlayerId, ZooEntry};

use crate::infrastructure::player_locks::PlayerLocks;
use crate::infrastructure::ports::{GameRepo, RepoError};

use super::achievements::AchievementEvaluator;

pub struct PlayerQueries {
    repo: Arc<dyn GameRepo>,
    achievements: Arc<AchievementEvaluator>,
    locks: Arc<PlayerLocks>,
}

impl PlayerQueries {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        achievements: Arc<AchievementEvaluator>,
        locks: Arc<PlayerLocks>,
    ) -> Self {
        Self {
            repo,
            achievements,
            locks,
        }
    }

    /// Register a player if new and make sure their achievement rows exist.
    pub async fn start(&self, player_id: PlayerId) -> Result<Player, RepoError> {
        let _guard = self.locks.acquire(player_id).await;
        let player = match self.repo.get_player(player_id).await? {
            Some(player) => player,
            None => {
                let player = Player::new(player_id);
                self.repo.upsert_player(&player).await?;
                tracing::info!(player_id = %player_id, "Player registered");
                player
            }
        };
        self.achievements.ensure_initialized(player_id).await?;
        Ok(player)
    }

    /// Current balance; zero for unknown players.
    pub async fn balance(&self, player_id: PlayerId) -> Result<u64, RepoError> {
        Ok(self
            .repo
            .get_player(player_id)
            .await?
            .map(|p| p.balance())
            .unwrap_or(0))
    }

    /// Captured creatures, rarest tier first, then by name.
    pub async fn zoo(&self, player_id: PlayerId) -> Result<Vec<ZooEntry>, RepoError> {
        let mut entries = self.repo.list_zoo_entries(player_id).await?;
        entries.sort_by(|a, b| {
            b.rarity()
                .cmp(&a.rarity())
                .then_with(|| a.creature().cmp(b.creature()))
        });
        Ok(entries)
    }

    /// Achievement records in registry order.
    pub async fn achievements(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<AchievementRecord>, RepoError> {
        let records = self.repo.list_achievements(player_id).await?;
        Ok(self.achievements.in_registry_order(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryGameRepo;
    use crate::infrastructure::ports::MockNotificationPort;
    use zoohunt_domain::{AchievementRegistry, CreatureName, Rarity};

    fn queries(repo: Arc<InMemoryGameRepo>) -> PlayerQueries {
        let locks = Arc::new(PlayerLocks::new());
        let achievements = Arc::new(AchievementEvaluator::new(
            repo.clone(),
            Arc::new(MockNotificationPort::new()),
            locks.clone(),
            AchievementRegistry::standard(),
        ));
        PlayerQueries::new(repo, achievements, locks)
    }

    #[tokio::test]
    async fn start_registers_once_and_initializes_achievements() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let queries = queries(repo.clone());
        let player_id = PlayerId::new();

        let player = queries.start(player_id).await.unwrap();
        assert_eq!(player.balance(), 0);
        repo.upsert_player(&player.clone().with_balance(40)).await.unwrap();

        let again = queries.start(player_id).await.unwrap();
        assert_eq!(again.balance(), 40);

        let names: Vec<String> = queries
            .achievements(player_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["First Hunt", "Collector", "Rare Hunter"]);
    }

    #[tokio::test]
    async fn balance_of_unknown_player_is_zero() {
        let queries = queries(Arc::new(InMemoryGameRepo::new()));
        assert_eq!(queries.balance(PlayerId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zoo_lists_rarest_first_then_by_name() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player_id = PlayerId::new();
        for (name, rarity) in [
            ("Snail", Rarity::Common),
            ("Dragon", Rarity::Legendary),
            ("Chick", Rarity::Common),
            ("Owl", Rarity::Uncommon),
        ] {
            let entry = ZooEntry::new(player_id, CreatureName::new(name).unwrap(), rarity);
            repo.upsert_zoo_entry(&entry).await.unwrap();
        }

        let names: Vec<String> = queries(repo)
            .zoo(player_id)
            .await
            .unwrap()
            .iter()
            .map(|e| e.creature().to_string())
            .collect();
        assert_eq!(names, vec!["Dragon", "Owl", "Chick", "Snail"]);
    }
}
