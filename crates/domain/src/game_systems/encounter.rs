//! Encounter generation - weighted rarity roll, then a uniform creature pick.

use serde::{Deserialize, Serialize};

use crate::value_objects::{CreatureName, Rarity};

/// The creature found by one hunt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub creature: CreatureName,
    pub rarity: Rarity,
}

/// Picks encounters from the fixed rarity tables.
///
/// Randomness is injected as a `roll(min, max)` closure returning an integer
/// in the inclusive range, so outcomes are reproducible in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterGenerator;

impl EncounterGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, mut roll: impl FnMut(i32, i32) -> i32) -> Encounter {
        let rarity = self.roll_rarity(&mut roll);
        let pool = rarity.pool();
        let max_index = pool.len() as i32 - 1;
        let index = roll(0, max_index).clamp(0, max_index) as usize;
        Encounter {
            creature: CreatureName::from_pool(pool[index]),
            rarity,
        }
    }

    /// Weighted tier selection over `roll(1, total_weight)`.
    pub fn roll_rarity(&self, mut roll: impl FnMut(i32, i32) -> i32) -> Rarity {
        let total = Rarity::total_weight() as i32;
        let mut ticket = roll(1, total).clamp(1, total);
        for rarity in Rarity::ALL {
            let weight = rarity.weight() as i32;
            if ticket <= weight {
                return rarity;
            }
            ticket -= weight;
        }
        Rarity::Common
    }
}
