//! ZooHunt Domain - core game types and rules.
//!
//! Everything here is pure: no storage, no async, no ambient randomness.

pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use entities::{AchievementRecord, Player, ZooEntry};

pub use error::DomainError;
pub use events::{AchievementUnlocked, EvolutionReveal, ProgressionEvent};

pub use game_systems::{
    apply_xp, AchievementDefinition, AchievementEvaluation, AchievementPredicate,
    AchievementRegistry, Encounter, EncounterGenerator, PredicateFailure,
};

pub use ids::PlayerId;

pub use value_objects::{AggregateStats, CreatureName, Rarity};
