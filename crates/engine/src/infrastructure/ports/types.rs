//! Data types carried across port boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zoohunt_domain::{
    AchievementRecord, AchievementUnlocked, CreatureName, Player, PlayerId, ProgressionEvent,
    Rarity, ZooEntry,
};

// =============================================================================
// Repository Types
// =============================================================================

/// Every row one operation writes, committed as a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub player: Player,
    pub zoo_entries: Vec<ZooEntry>,
    pub achievements: Vec<AchievementRecord>,
}

impl ChangeSet {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            zoo_entries: Vec::new(),
            achievements: Vec::new(),
        }
    }

    pub fn with_zoo_entry(mut self, entry: ZooEntry) -> Self {
        self.zoo_entries.push(entry);
        self
    }

    pub fn with_achievements(
        mut self,
        records: impl IntoIterator<Item = AchievementRecord>,
    ) -> Self {
        self.achievements.extend(records);
        self
    }
}

// =============================================================================
// Hunt Types
// =============================================================================

/// Who triggered a hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HuntMode {
    /// Player-issued command.
    Manual,
    /// Autohunt scheduler on the player's behalf; pays the autohunt cost.
    Automated,
}

impl fmt::Display for HuntMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automated => write!(f, "automated"),
        }
    }
}

/// Everything a committed hunt produced, for relaying to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntOutcome {
    pub player_id: PlayerId,
    pub mode: HuntMode,
    pub creature: CreatureName,
    pub rarity: Rarity,
    pub coins_earned: u64,
    pub autohunt_cost: u64,
    pub xp_gained: u32,
    /// Balance after the hunt, achievement rewards included.
    pub balance: u64,
    pub progression: Vec<ProgressionEvent>,
    pub achievements: Vec<AchievementUnlocked>,
    pub at: DateTime<Utc>,
}

// =============================================================================
// Notification Types
// =============================================================================

/// Why autohunt was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoHuntStopReason {
    /// The player turned it off.
    Requested,
    /// Balance could not cover the autohunt cost.
    InsufficientFunds,
}

/// Payload delivered to a player through the notification port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Notification {
    HuntCompleted(HuntOutcome),
    AutoHuntStarted,
    AutoHuntStopped { reason: AutoHuntStopReason },
    DailyClaimed { reward: u64, balance: u64 },
    AchievementsUnlocked { unlocked: Vec<AchievementUnlocked> },
}
