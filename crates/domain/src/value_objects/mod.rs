//! Value objects - immutable, validated domain values.

mod aggregate_stats;
mod names;
mod rarity;

pub use aggregate_stats::AggregateStats;
pub use names::CreatureName;
pub use rarity::Rarity;
