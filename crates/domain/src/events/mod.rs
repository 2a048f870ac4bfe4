//! Domain Events
//!
//! Return types from progression and achievement rules, communicating what
//! happened when state was modified. They are relayed to players by the
//! engine's notification port.

use serde::{Deserialize, Serialize};

use crate::constants::EVOLUTION_MARKERS;
use crate::value_objects::CreatureName;

/// Ordered stage markers shown when a creature evolves.
///
/// The core only produces the sequence; pacing the reveal is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionReveal {
    pub steps: Vec<String>,
}

impl EvolutionReveal {
    /// Reveal for an evolution into `stage`: one marker per stage, capped by the marker list.
    pub fn for_stage(stage: u32) -> Self {
        let len = (stage as usize).min(EVOLUTION_MARKERS.len());
        Self {
            steps: EVOLUTION_MARKERS[..len]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Event produced while applying experience to a zoo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ProgressionEvent {
    LevelUp {
        creature: CreatureName,
        level: u32,
    },
    Evolved {
        creature: CreatureName,
        stage: u32,
        reveal: EvolutionReveal,
    },
}

/// An achievement that became unlocked, with the coins credited for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUnlocked {
    pub name: String,
    pub reward_coins: u64,
}
