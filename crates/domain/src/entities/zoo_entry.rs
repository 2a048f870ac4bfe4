//! ZooEntry - one creature species owned by a player

use serde::{Deserialize, Serialize};

use crate::constants::LEVEL_XP_MULTIPLIER;
use crate::error::DomainError;
use crate::value_objects::{CreatureName, Rarity};
use crate::PlayerId;

/// A creature species in a player's zoo, keyed by `(player_id, creature)`.
///
/// # Invariants
///
/// - `level >= 1`
/// - `xp < level * LEVEL_XP_MULTIPLIER`
/// - `evolution_stage` only grows, and only through [`crate::game_systems::apply_xp`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZooEntry {
    player_id: PlayerId,
    creature: CreatureName,
    rarity: Rarity,
    count: u32,
    xp: u32,
    level: u32,
    evolution_stage: u32,
}

impl ZooEntry {
    /// A species the player has never caught: count 0, level 1, no xp.
    pub fn new(player_id: PlayerId, creature: CreatureName, rarity: Rarity) -> Self {
        Self {
            player_id,
            creature,
            rarity,
            count: 0,
            xp: 0,
            level: 1,
            evolution_stage: 0,
        }
    }

    /// Rebuild an entry from persisted values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the stored values break the
    /// level or xp invariants.
    pub fn restore(
        player_id: PlayerId,
        creature: CreatureName,
        rarity: Rarity,
        count: u32,
        xp: u32,
        level: u32,
        evolution_stage: u32,
    ) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation("Zoo entry level must be at least 1"));
        }
        if u64::from(xp) >= u64::from(level) * u64::from(LEVEL_XP_MULTIPLIER) {
            return Err(DomainError::validation(format!(
                "Zoo entry xp {} is not below the level {} threshold",
                xp, level
            )));
        }
        Ok(Self {
            player_id,
            creature,
            rarity,
            count,
            xp,
            level,
            evolution_stage,
        })
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn creature(&self) -> &CreatureName {
        &self.creature
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn evolution_stage(&self) -> u32 {
        self.evolution_stage
    }

    /// XP needed at the current level before the next level-up.
    pub fn level_threshold(&self) -> u32 {
        self.level.saturating_mul(LEVEL_XP_MULTIPLIER)
    }

    pub fn record_capture(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub(crate) fn set_progress(&mut self, xp: u32, level: u32, evolution_stage: u32) {
        self.xp = xp;
        self.level = level;
        self.evolution_stage = evolution_stage;
    }
}
