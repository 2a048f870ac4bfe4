//! Rarity tiers and their fixed tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Rarity tier of a creature.
///
/// Tiers are ordered from most to least common; the derived ordering is used
/// when listing a zoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// All tiers in sampling order.
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    /// Integer sampling weight. Weights across all tiers sum to 100.
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 70,
            Rarity::Uncommon => 20,
            Rarity::Rare => 8,
            Rarity::Legendary => 2,
        }
    }

    /// Bonus coins added to the base hunt reward.
    pub fn bonus(self) -> u64 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 10,
            Rarity::Rare => 30,
            Rarity::Legendary => 100,
        }
    }

    /// Creature names obtainable in this tier.
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            Rarity::Common => &["Rabbit", "Squirrel", "Chick", "Caterpillar", "Snail"],
            Rarity::Uncommon => &["Fox", "Deer", "Hedgehog", "Owl", "Boar"],
            Rarity::Rare => &["Bear", "Eagle", "Lion", "Leopard", "Crocodile"],
            Rarity::Legendary => &["Dragon", "Unicorn", "Phoenix", "T-Rex", "Dinosaur"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Sum of all tier weights.
    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(|r| r.weight()).sum()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Common" => Ok(Rarity::Common),
            "Uncommon" => Ok(Rarity::Uncommon),
            "Rare" => Ok(Rarity::Rare),
            "Legendary" => Ok(Rarity::Legendary),
            _ => Err(DomainError::parse(format!("Unknown rarity: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        assert_eq!(Rarity::total_weight(), 100);
    }

    #[test]
    fn pools_are_non_empty_and_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for rarity in Rarity::ALL {
            assert!(!rarity.pool().is_empty());
            for name in rarity.pool() {
                assert!(seen.insert(*name), "{} appears in two pools", name);
            }
        }
    }

    #[test]
    fn parses_display_output() {
        for rarity in Rarity::ALL {
            assert_eq!(rarity.to_string().parse::<Rarity>(), Ok(rarity));
        }
        assert!("Mythic".parse::<Rarity>().is_err());
    }
}
