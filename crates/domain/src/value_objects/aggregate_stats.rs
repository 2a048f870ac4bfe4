//! Aggregate statistics over a player's zoo.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::ZooEntry;
use crate::error::DomainError;
use crate::value_objects::Rarity;

/// Read-only summary of a player's zoo, consumed by achievement predicates.
///
/// Per-rarity maps may be built by a storage backend that omits empty groups;
/// lookups of a tier with no row report [`DomainError::MissingStat`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Sum of capture counts across all species.
    pub total_captured: u64,
    /// Number of species with at least one entry.
    pub distinct_species: u32,
    /// Number of species per rarity tier.
    pub species_by_rarity: BTreeMap<Rarity, u32>,
    /// Sum of capture counts per rarity tier.
    pub captured_by_rarity: BTreeMap<Rarity, u64>,
}

impl AggregateStats {
    /// Stats for an empty zoo, with every tier present at zero.
    pub fn empty() -> Self {
        Self {
            total_captured: 0,
            distinct_species: 0,
            species_by_rarity: Rarity::ALL.iter().map(|r| (*r, 0)).collect(),
            captured_by_rarity: Rarity::ALL.iter().map(|r| (*r, 0)).collect(),
        }
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ZooEntry>) -> Self {
        let mut stats = Self::empty();
        for entry in entries {
            let count = u64::from(entry.count());
            stats.total_captured += count;
            stats.distinct_species += 1;
            *stats.species_by_rarity.entry(entry.rarity()).or_insert(0) += 1;
            *stats.captured_by_rarity.entry(entry.rarity()).or_insert(0) += count;
        }
        stats
    }

    pub fn species_of(&self, rarity: Rarity) -> Result<u32, DomainError> {
        self.species_by_rarity
            .get(&rarity)
            .copied()
            .ok_or_else(|| DomainError::missing_stat(format!("species_by_rarity[{}]", rarity)))
    }

    pub fn captured_of(&self, rarity: Rarity) -> Result<u64, DomainError> {
        self.captured_by_rarity
            .get(&rarity)
            .copied()
            .ok_or_else(|| DomainError::missing_stat(format!("captured_by_rarity[{}]", rarity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CreatureName;
    use crate::PlayerId;

    fn entry(player_id: PlayerId, name: &str, rarity: Rarity, count: u32) -> ZooEntry {
        let mut entry = ZooEntry::new(player_id, CreatureName::new(name).unwrap(), rarity);
        for _ in 0..count {
            entry.record_capture();
        }
        entry
    }

    #[test]
    fn empty_has_every_tier_at_zero() {
        let stats = AggregateStats::empty();
        for rarity in Rarity::ALL {
            assert_eq!(stats.species_of(rarity), Ok(0));
            assert_eq!(stats.captured_of(rarity), Ok(0));
        }
    }

    #[test]
    fn sums_counts_and_species() {
        let player_id = PlayerId::new();
        let entries = vec![
            entry(player_id, "Rabbit", Rarity::Common, 4),
            entry(player_id, "Snail", Rarity::Common, 1),
            entry(player_id, "Bear", Rarity::Rare, 2),
        ];
        let stats = AggregateStats::from_entries(&entries);
        assert_eq!(stats.total_captured, 7);
        assert_eq!(stats.distinct_species, 3);
        assert_eq!(stats.species_of(Rarity::Common), Ok(2));
        assert_eq!(stats.captured_of(Rarity::Common), Ok(5));
        assert_eq!(stats.species_of(Rarity::Rare), Ok(1));
        assert_eq!(stats.species_of(Rarity::Legendary), Ok(0));
    }

    #[test]
    fn missing_tier_is_reported() {
        let stats = AggregateStats::default();
        assert!(matches!(
            stats.species_of(Rarity::Rare),
            Err(DomainError::MissingStat(_))
        ));
    }
}
