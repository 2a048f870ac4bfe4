//! Daily reward claims.

use std::sync::Arc;

use zoohunt_domain::constants::DAILY_REWARD;
use zoohunt_domain::{Player, PlayerId};

use crate::infrastructure::player_locks::PlayerLocks;
use crate::infrastructure::ports::{
    ChangeSet, ClockPort, GameRepo, Notification, NotificationPort, RepoError,
};

use super::notify_player;

#[derive(Debug, thiserror::Error)]
pub enum DailyError {
    #[error("Daily reward already claimed, {remaining_secs}s remaining")]
    AlreadyClaimed { remaining_secs: i64 },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Result of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClaim {
    pub reward: u64,
    pub balance: u64,
}

pub struct DailyReward {
    repo: Arc<dyn GameRepo>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<PlayerLocks>,
}

impl DailyReward {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<PlayerLocks>,
    ) -> Self {
        Self {
            repo,
            notifier,
            clock,
            locks,
        }
    }

    /// Credit the daily reward once per 24 hours.
    pub async fn claim(&self, player_id: PlayerId) -> Result<DailyClaim, DailyError> {
        let claim = {
            let _guard = self.locks.acquire(player_id).await;
            let now = self.clock.now();
            let mut player = self
                .repo
                .get_player(player_id)
                .await?
                .unwrap_or_else(|| Player::new(player_id));

            if let Some(remaining_secs) = player.daily_cooldown_remaining(now) {
                return Err(DailyError::AlreadyClaimed { remaining_secs });
            }

            player.claim_daily(DAILY_REWARD, now);
            let balance = player.balance();
            self.repo.commit(&ChangeSet::new(player)).await?;
            DailyClaim {
                reward: DAILY_REWARD,
                balance,
            }
        };

        tracing::info!(player_id = %player_id, balance = claim.balance, "Daily reward claimed");
        notify_player(
            self.notifier.as_ref(),
            player_id,
            Notification::DailyClaimed {
                reward: claim.reward,
                balance: claim.balance,
            },
        )
        .await;
        Ok(claim)
    }
}
