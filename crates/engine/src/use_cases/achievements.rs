//! Achievement bookkeeping on top of the domain registry.
//!
//! Hunts evaluate achievements in memory via [`AchievementEvaluator::apply`] so
//! the rewards land in the same commit as the hunt. [`AchievementEvaluator::evaluate`]
//! is the standalone path that commits on its own.

use std::sync::Arc;

use zoohunt_domain::{
    AchievementRecord, AchievementRegistry, AchievementUnlocked, AggregateStats, Player, PlayerId,
};

use crate::infrastructure::player_locks::PlayerLocks;
use crate::infrastructure::ports::{
    ChangeSet, GameRepo, Notification, NotificationPort, RepoError,
};

use super::notify_player;

/// Achievement changes computed for one player, not yet persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedAchievements {
    pub unlocked: Vec<AchievementUnlocked>,
    /// Records to write: newly created rows plus rows unlocked by this pass.
    pub dirty: Vec<AchievementRecord>,
}

pub struct AchievementEvaluator {
    repo: Arc<dyn GameRepo>,
    notifier: Arc<dyn NotificationPort>,
    locks: Arc<PlayerLocks>,
    registry: AchievementRegistry,
}

impl AchievementEvaluator {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        notifier: Arc<dyn NotificationPort>,
        locks: Arc<PlayerLocks>,
        registry: AchievementRegistry,
    ) -> Self {
        Self {
            repo,
            notifier,
            locks,
            registry,
        }
    }

    pub fn registry(&self) -> &AchievementRegistry {
        &self.registry
    }

    /// Create a locked record for every registered achievement the player lacks.
    ///
    /// Returns the player's records in registry order.
    pub async fn ensure_initialized(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<AchievementRecord>, RepoError> {
        let existing = self.repo.list_achievements(player_id).await?;
        let missing = self.registry.missing_records(player_id, &existing);
        for record in &missing {
            self.repo.upsert_achievement(record).await?;
        }
        if !missing.is_empty() {
            tracing::debug!(
                player_id = %player_id,
                created = missing.len(),
                "Initialized achievement records"
            );
        }

        let mut records = existing;
        records.extend(missing);
        Ok(self.in_registry_order(records))
    }

    /// Unlock and reward every achievement `stats` now satisfies, then commit.
    ///
    /// Acquires the player's lock. Players without a stored row are created
    /// with defaults.
    pub async fn evaluate(
        &self,
        player_id: PlayerId,
        stats: &AggregateStats,
    ) -> Result<Vec<AchievementUnlocked>, RepoError> {
        let unlocked = {
            let _guard = self.locks.acquire(player_id).await;

            let mut player = self
                .repo
                .get_player(player_id)
                .await?
                .unwrap_or_else(|| Player::new(player_id));
            let existing = self.repo.list_achievements(player_id).await?;
            let applied = self.apply(&mut player, existing, stats);

            if !applied.dirty.is_empty() {
                let changes = ChangeSet::new(player).with_achievements(applied.dirty);
                self.repo.commit(&changes).await?;
            }
            applied.unlocked
        };

        if !unlocked.is_empty() {
            tracing::info!(
                player_id = %player_id,
                count = unlocked.len(),
                "Achievements unlocked"
            );
            notify_player(
                self.notifier.as_ref(),
                player_id,
                Notification::AchievementsUnlocked {
                    unlocked: unlocked.clone(),
                },
            )
            .await;
        }
        Ok(unlocked)
    }

    /// Evaluate in memory, crediting rewards to `player`.
    ///
    /// Missing records are created first so the result is complete even for a
    /// brand new player. Predicate failures are logged and skipped.
    pub fn apply(
        &self,
        player: &mut Player,
        existing: Vec<AchievementRecord>,
        stats: &AggregateStats,
    ) -> AppliedAchievements {
        let missing = self.registry.missing_records(player.id(), &existing);
        let first_new = existing.len();
        let mut records = existing;
        records.extend(missing);

        let (evaluation, changed) = self.registry.evaluate(player, &mut records, stats);
        for failure in &evaluation.failures {
            tracing::warn!(
                player_id = %player.id(),
                achievement = failure.name,
                error = %failure.error,
                "Achievement predicate failed"
            );
        }

        let dirty = records
            .into_iter()
            .enumerate()
            .filter(|(index, _)| *index >= first_new || changed.contains(index))
            .map(|(_, record)| record)
            .collect();

        AppliedAchievements {
            unlocked: evaluation.unlocked,
            dirty,
        }
    }

    /// Sort records by registry position; unknown names go last by name.
    pub fn in_registry_order(&self, mut records: Vec<AchievementRecord>) -> Vec<AchievementRecord> {
        let position = |name: &str| {
            self.registry
                .definitions()
                .iter()
                .position(|d| d.name == name)
                .unwrap_or(usize::MAX)
        };
        records.sort_by(|a, b| {
            position(a.name())
                .cmp(&position(b.name()))
                .then_with(|| a.name().cmp(b.name()))
        });
        records
    }
}
