//! Experience, levels and evolution for a single zoo entry.

use crate::constants::{EVOLUTION_LEVEL_INTERVAL, LEVEL_XP_MULTIPLIER};
use crate::entities::ZooEntry;
use crate::events::{EvolutionReveal, ProgressionEvent};

/// Add `amount` xp to `entry` and normalize it into levels and evolutions.
///
/// Each time xp reaches `level * 100` that much is subtracted and the level
/// goes up by one. Reaching a level that is a multiple of 5 advances the
/// evolution stage by one. One grant can cross several levels and stages;
/// events come out in the order they happened.
pub fn apply_xp(mut entry: ZooEntry, amount: u32) -> (ZooEntry, Vec<ProgressionEvent>) {
    let mut events = Vec::new();
    let mut xp = u64::from(entry.xp()) + u64::from(amount);
    let mut level = entry.level();
    let mut stage = entry.evolution_stage();

    while xp >= u64::from(level) * u64::from(LEVEL_XP_MULTIPLIER) {
        xp -= u64::from(level) * u64::from(LEVEL_XP_MULTIPLIER);
        level += 1;
        events.push(ProgressionEvent::LevelUp {
            creature: entry.creature().clone(),
            level,
        });

        if level % EVOLUTION_LEVEL_INTERVAL == 0 {
            stage += 1;
            events.push(ProgressionEvent::Evolved {
                creature: entry.creature().clone(),
                stage,
                reveal: EvolutionReveal::for_stage(stage),
            });
        }
    }

    // xp < level * 100 here, and level * 100 fits in u32 for any reachable level
    entry.set_progress(xp as u32, level, stage);
    (entry, events)
}
