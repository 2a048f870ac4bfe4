//! Repository port trait for game state persistence.

use async_trait::async_trait;
use zoohunt_domain::{
    AchievementRecord, AggregateStats, CreatureName, Player, PlayerId, ZooEntry,
};

use super::error::RepoError;
use super::types::ChangeSet;

// =============================================================================
// Game State Storage
// =============================================================================

/// Durable storage for players, zoo entries and achievement records.
///
/// Single-row upserts are for standalone changes. Anything that touches more
/// than one row for a player goes through [`GameRepo::commit`], which must
/// persist the whole change set or nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepo: Send + Sync {
    // Players
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    async fn upsert_player(&self, player: &Player) -> Result<(), RepoError>;
    /// Players with the autohunt flag set (restored into the scheduler on startup).
    async fn list_autohunt_players(&self) -> Result<Vec<PlayerId>, RepoError>;

    // Zoo
    async fn get_zoo_entry(
        &self,
        player_id: PlayerId,
        creature: &CreatureName,
    ) -> Result<Option<ZooEntry>, RepoError>;
    async fn upsert_zoo_entry(&self, entry: &ZooEntry) -> Result<(), RepoError>;
    async fn list_zoo_entries(&self, player_id: PlayerId) -> Result<Vec<ZooEntry>, RepoError>;
    async fn aggregate_stats(&self, player_id: PlayerId) -> Result<AggregateStats, RepoError>;

    // Achievements
    async fn get_achievement(
        &self,
        player_id: PlayerId,
        name: &str,
    ) -> Result<Option<AchievementRecord>, RepoError>;
    async fn upsert_achievement(&self, record: &AchievementRecord) -> Result<(), RepoError>;
    async fn list_achievements(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<AchievementRecord>, RepoError>;

    /// Persist every row in `changes` atomically.
    async fn commit(&self, changes: &ChangeSet) -> Result<(), RepoError>;
}
