//! Achievement definitions and their evaluation against aggregate stats.

use crate::entities::{AchievementRecord, Player};
use crate::error::DomainError;
use crate::events::AchievementUnlocked;
use crate::value_objects::{AggregateStats, Rarity};
use crate::PlayerId;

/// Unlock condition over a player's aggregate stats.
pub type AchievementPredicate = fn(&AggregateStats) -> Result<bool, DomainError>;

/// A named achievement with its one-time coin reward.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    pub name: &'static str,
    pub reward_coins: u64,
    pub predicate: AchievementPredicate,
}

/// A predicate that could not be evaluated for a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateFailure {
    pub name: &'static str,
    pub error: DomainError,
}

/// Result of evaluating every locked achievement once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementEvaluation {
    pub unlocked: Vec<AchievementUnlocked>,
    pub failures: Vec<PredicateFailure>,
}

/// Ordered registry of achievement definitions.
///
/// Evaluation walks definitions in insertion order.
#[derive(Debug, Clone)]
pub struct AchievementRegistry {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementRegistry {
    pub fn new(definitions: Vec<AchievementDefinition>) -> Self {
        Self { definitions }
    }

    /// The game's built-in achievements.
    pub fn standard() -> Self {
        Self::new(vec![
            AchievementDefinition {
                name: "First Hunt",
                reward_coins: 50,
                predicate: |stats| Ok(stats.total_captured >= 1),
            },
            AchievementDefinition {
                name: "Collector",
                reward_coins: 200,
                predicate: |stats| Ok(stats.total_captured >= 10),
            },
            AchievementDefinition {
                name: "Rare Hunter",
                reward_coins: 300,
                predicate: |stats| Ok(stats.species_of(Rarity::Rare)? >= 3),
            },
        ])
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Records for definitions the player has no row for yet, all locked.
    pub fn missing_records(
        &self,
        player_id: PlayerId,
        existing: &[AchievementRecord],
    ) -> Vec<AchievementRecord> {
        self.definitions
            .iter()
            .filter(|d| !existing.iter().any(|r| r.name() == d.name))
            .map(|d| AchievementRecord::new(player_id, d.name, d.reward_coins))
            .collect()
    }

    /// Unlock every locked achievement whose predicate holds and credit its reward.
    ///
    /// `records` must already contain a row per definition (see
    /// [`Self::missing_records`]); definitions without a row are skipped. A
    /// failing predicate is reported in `failures` and does not stop the rest.
    /// Returns the indices of modified records alongside the evaluation.
    pub fn evaluate(
        &self,
        player: &mut Player,
        records: &mut [AchievementRecord],
        stats: &AggregateStats,
    ) -> (AchievementEvaluation, Vec<usize>) {
        let mut evaluation = AchievementEvaluation::default();
        let mut changed = Vec::new();

        for definition in &self.definitions {
            let Some(index) = records.iter().position(|r| r.name() == definition.name) else {
                continue;
            };
            if records[index].unlocked() {
                continue;
            }

            match (definition.predicate)(stats) {
                Ok(true) => {
                    if records[index].unlock() {
                        let reward = records[index].reward_coins();
                        player.credit(reward);
                        changed.push(index);
                        evaluation.unlocked.push(AchievementUnlocked {
                            name: definition.name.to_string(),
                            reward_coins: reward,
                        });
                    }
                }
                Ok(false) => {}
                Err(error) => evaluation.failures.push(PredicateFailure {
                    name: definition.name,
                    error,
                }),
            }
        }

        (evaluation, changed)
    }
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u64, rare_species: u32) -> AggregateStats {
        let mut stats = AggregateStats::empty();
        stats.total_captured = total;
        stats.species_by_rarity.insert(Rarity::Rare, rare_species);
        stats
    }

    fn setup() -> (AchievementRegistry, Player, Vec<AchievementRecord>) {
        let registry = AchievementRegistry::standard();
        let player = Player::new(PlayerId::new());
        let records = registry.missing_records(player.id(), &[]);
        (registry, player, records)
    }

    #[test]
    fn standard_registry_is_ordered() {
        let names: Vec<_> = AchievementRegistry::standard()
            .definitions()
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["First Hunt", "Collector", "Rare Hunter"]);
    }

    #[test]
    fn missing_records_only_adds_absent_rows() {
        let (registry, player, mut records) = setup();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.unlocked()));

        records.remove(1);
        let missing = registry.missing_records(player.id(), &records);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name(), "Collector");
        assert_eq!(missing[0].reward_coins(), 200);
    }

    #[test]
    fn unlocks_in_registry_order_and_credits() {
        let (registry, mut player, mut records) = setup();
        let (evaluation, changed) = registry.evaluate(&mut player, &mut records, &stats(10, 3));

        let names: Vec<_> = evaluation.unlocked.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["First Hunt", "Collector", "Rare Hunter"]);
        assert_eq!(changed, vec![0, 1, 2]);
        assert_eq!(player.balance(), 50 + 200 + 300);
    }

    #[test]
    fn collector_unlocks_exactly_once() {
        let (registry, mut player, mut records) = setup();
        registry.evaluate(&mut player, &mut records, &stats(10, 0));
        let balance = player.balance();

        for total in 11..30 {
            let (evaluation, changed) =
                registry.evaluate(&mut player, &mut records, &stats(total, 0));
            assert!(evaluation.unlocked.is_empty());
            assert!(changed.is_empty());
        }
        assert_eq!(player.balance(), balance);
    }

    #[test]
    fn failing_predicate_does_not_block_siblings() {
        let registry = AchievementRegistry::new(vec![
            AchievementDefinition {
                name: "Broken",
                reward_coins: 1,
                predicate: |_| Err(DomainError::missing_stat("anything")),
            },
            AchievementDefinition {
                name: "First Hunt",
                reward_coins: 50,
                predicate: |stats| Ok(stats.total_captured >= 1),
            },
        ]);
        let mut player = Player::new(PlayerId::new());
        let mut records = registry.missing_records(player.id(), &[]);

        let (evaluation, _) = registry.evaluate(&mut player, &mut records, &stats(1, 0));

        assert_eq!(evaluation.failures.len(), 1);
        assert_eq!(evaluation.failures[0].name, "Broken");
        assert_eq!(evaluation.unlocked.len(), 1);
        assert_eq!(player.balance(), 50);
        assert!(!records[0].unlocked());
    }

    #[test]
    fn rare_hunter_reports_missing_tier() {
        let (registry, mut player, mut records) = setup();
        // Backend that omits empty per-rarity groups
        let partial = AggregateStats::default();

        let (evaluation, _) = registry.evaluate(&mut player, &mut records, &partial);
        assert_eq!(evaluation.failures.len(), 1);
        assert_eq!(evaluation.failures[0].name, "Rare Hunter");
    }
}
