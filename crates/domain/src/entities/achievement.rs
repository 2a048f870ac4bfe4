//! AchievementRecord - per-player unlock state of one achievement

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Unlock state of one achievement for one player.
///
/// `unlocked` only ever goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    player_id: PlayerId,
    name: String,
    unlocked: bool,
    reward_coins: u64,
}

impl AchievementRecord {
    /// A locked record for the given achievement.
    pub fn new(player_id: PlayerId, name: impl Into<String>, reward_coins: u64) -> Self {
        Self {
            player_id,
            name: name.into(),
            unlocked: false,
            reward_coins,
        }
    }

    /// Rebuild a record from persisted values.
    pub fn restore(
        player_id: PlayerId,
        name: impl Into<String>,
        unlocked: bool,
        reward_coins: u64,
    ) -> Self {
        Self {
            player_id,
            name: name.into(),
            unlocked,
            reward_coins,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn reward_coins(&self) -> u64 {
        self.reward_coins
    }

    /// Unlock the achievement. Returns `true` only on the first call.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        true
    }
}
