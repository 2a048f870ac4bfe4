//! Game rules for the hunting loop.
//!
//! Pure, synchronous rules with no I/O:
//!
//! - `encounter` - weighted rarity roll and creature pick
//! - `progression` - xp, levels and evolution stages
//! - `achievements` - achievement registry and evaluation

mod achievements;
mod encounter;
mod progression;

pub use achievements::{
    AchievementDefinition, AchievementEvaluation, AchievementPredicate, AchievementRegistry,
    PredicateFailure,
};
pub use encounter::{Encounter, EncounterGenerator};
pub use progression::apply_xp;
