//! Domain entities
//!
//! Persisted game state: players, their zoo entries and achievement records.

pub mod achievement;
pub mod player;
pub mod zoo_entry;

pub use achievement::AchievementRecord;
pub use player::Player;
pub use zoo_entry::ZooEntry;
