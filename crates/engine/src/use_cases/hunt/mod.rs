//! Hunt resolution.
//!
//! One hunt is a read-compute-commit cycle over a single player's state:
//! cooldown and funds checks, encounter, coins, capture, experience and
//! achievements, written with one [`GameRepo::commit`] while the player's lock
//! is held.

mod error;

pub use error::HuntError;

use std::sync::Arc;

use zoohunt_domain::constants::{
    AUTOHUNT_COST, BASE_HUNT_REWARD, DOUBLE_COINS_MULTIPLIER, XP_BOOST_MULTIPLIER, XP_PER_HUNT,
};
use zoohunt_domain::{apply_xp, AggregateStats, EncounterGenerator, Player, PlayerId, ZooEntry};

use crate::infrastructure::player_locks::PlayerLocks;
use crate::infrastructure::ports::{
    ChangeSet, ClockPort, GameRepo, HuntMode, HuntOutcome, Notification, NotificationPort,
    RandomPort,
};

use super::achievements::AchievementEvaluator;
use super::notify_player;

/// Resolves manual and automated hunts.
pub struct HuntResolver {
    repo: Arc<dyn GameRepo>,
    achievements: Arc<AchievementEvaluator>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    locks: Arc<PlayerLocks>,
    generator: EncounterGenerator,
}

impl HuntResolver {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        achievements: Arc<AchievementEvaluator>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        locks: Arc<PlayerLocks>,
    ) -> Self {
        Self {
            repo,
            achievements,
            notifier,
            clock,
            random,
            locks,
            generator: EncounterGenerator::new(),
        }
    }

    /// Resolve one hunt for `player_id` and notify the player.
    ///
    /// Unknown players are created with defaults. Notification failures are
    /// logged; the committed hunt stands.
    pub async fn resolve(
        &self,
        player_id: PlayerId,
        mode: HuntMode,
    ) -> Result<HuntOutcome, HuntError> {
        let outcome = {
            let _guard = self.locks.acquire(player_id).await;
            self.resolve_locked(player_id, mode).await?
        };

        notify_player(
            self.notifier.as_ref(),
            player_id,
            Notification::HuntCompleted(outcome.clone()),
        )
        .await;
        Ok(outcome)
    }

    /// Resolve without taking the player's lock or notifying.
    ///
    /// The caller must hold `player_id`'s lock from [`PlayerLocks`].
    pub(crate) async fn resolve_locked(
        &self,
        player_id: PlayerId,
        mode: HuntMode,
    ) -> Result<HuntOutcome, HuntError> {
        let now = self.clock.now();
        let mut player = self
            .repo
            .get_player(player_id)
            .await?
            .unwrap_or_else(|| Player::new(player_id));

        if let Some(remaining_secs) = player.hunt_cooldown_remaining(now) {
            tracing::debug!(player_id = %player_id, remaining_secs, mode = %mode, "Hunt on cooldown");
            return Err(HuntError::CooldownActive { remaining_secs });
        }

        let cost = match mode {
            HuntMode::Manual => 0,
            HuntMode::Automated => AUTOHUNT_COST,
        };
        let balance = player.balance();
        if balance < cost {
            return Err(HuntError::InsufficientFunds { balance, cost });
        }

        let encounter = self
            .generator
            .generate(|min, max| self.random.gen_range(min, max));

        let coin_multiplier = if player.double_coins_active() {
            DOUBLE_COINS_MULTIPLIER
        } else {
            1
        };
        let coins_earned = (BASE_HUNT_REWARD + encounter.rarity.bonus()) * coin_multiplier;
        player
            .settle_hunt(coins_earned, cost, now)
            .map_err(|_| HuntError::InsufficientFunds { balance, cost })?;

        let mut entry = self
            .repo
            .get_zoo_entry(player_id, &encounter.creature)
            .await?
            .unwrap_or_else(|| {
                ZooEntry::new(player_id, encounter.creature.clone(), encounter.rarity)
            });
        entry.record_capture();

        let xp_gained = if player.xp_boost_active() {
            XP_PER_HUNT * XP_BOOST_MULTIPLIER
        } else {
            XP_PER_HUNT
        };
        let (entry, progression) = apply_xp(entry, xp_gained);

        // Stats must include this capture, which is not committed yet
        let mut entries = self.repo.list_zoo_entries(player_id).await?;
        match entries
            .iter_mut()
            .find(|existing| existing.creature() == entry.creature())
        {
            Some(slot) => *slot = entry.clone(),
            None => entries.push(entry.clone()),
        }
        let stats = AggregateStats::from_entries(&entries);

        let records = self.repo.list_achievements(player_id).await?;
        let applied = self.achievements.apply(&mut player, records, &stats);

        let balance = player.balance();
        let changes = ChangeSet::new(player)
            .with_zoo_entry(entry)
            .with_achievements(applied.dirty);
        self.repo.commit(&changes).await?;

        tracing::info!(
            player_id = %player_id,
            mode = %mode,
            creature = %encounter.creature,
            rarity = %encounter.rarity,
            coins_earned,
            cost,
            balance,
            "Hunt resolved"
        );

        Ok(HuntOutcome {
            player_id,
            mode,
            creature: encounter.creature,
            rarity: encounter.rarity,
            coins_earned,
            autohunt_cost: cost,
            xp_gained,
            balance,
            progression,
            achievements: applied.unlocked,
            at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{
        secs_to_time, FixedClock, FixedRandom, ManualClock, ScriptedRandom,
    };
    use crate::infrastructure::memory::InMemoryGameRepo;
    use crate::infrastructure::notifier::ChannelNotifier;
    use crate::infrastructure::ports::{
        MockClockPort, MockGameRepo, MockNotificationPort, MockRandomPort, NotifyError, RepoError,
    };
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};
    use zoohunt_domain::{
        AchievementRecord, AchievementRegistry, CreatureName, ProgressionEvent, Rarity,
    };

    fn resolver(
        repo: Arc<dyn GameRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> HuntResolver {
        let locks = Arc::new(PlayerLocks::new());
        let achievements = Arc::new(AchievementEvaluator::new(
            repo.clone(),
            notifier.clone(),
            locks.clone(),
            AchievementRegistry::standard(),
        ));
        HuntResolver::new(repo, achievements, notifier, clock, random, locks)
    }

    fn quiet_notifier() -> Arc<dyn NotificationPort> {
        let mut notifier = MockNotificationPort::new();
        notifier.expect_notify().returning(|_, _| Ok(()));
        Arc::new(notifier)
    }

    /// Advances ten seconds on every read, so serialized hunts never hit the cooldown.
    struct SteppingClock(AtomicI64);

    impl ClockPort for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            secs_to_time(self.0.fetch_add(10, Ordering::SeqCst))
        }
    }

    #[tokio::test]
    async fn first_manual_hunt_credits_coins_and_first_hunt() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let (notifier, mut received) = ChannelNotifier::channel();
        let player_id = PlayerId::new();
        let resolver = resolver(
            repo.clone(),
            Arc::new(notifier),
            Arc::new(FixedClock(secs_to_time(100))),
            Arc::new(FixedRandom(0)),
        );

        let outcome = resolver.resolve(player_id, HuntMode::Manual).await.unwrap();

        assert_eq!(outcome.creature.as_str(), "Rabbit");
        assert_eq!(outcome.rarity, Rarity::Common);
        assert_eq!(outcome.coins_earned, 50);
        assert_eq!(outcome.autohunt_cost, 0);
        assert_eq!(outcome.xp_gained, 10);
        assert_eq!(outcome.achievements.len(), 1);
        assert_eq!(outcome.achievements[0].name, "First Hunt");
        // 50 for the hunt plus 50 for First Hunt
        assert_eq!(outcome.balance, 100);

        let player = repo.get_player(player_id).await.unwrap().unwrap();
        assert_eq!(player.balance(), 100);
        assert_eq!(player.last_hunt_at(), secs_to_time(100));

        let entry = repo
            .get_zoo_entry(player_id, &CreatureName::new("Rabbit").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!((entry.count(), entry.xp(), entry.level()), (1, 10, 1));
        assert_eq!(repo.list_achievements(player_id).await.unwrap().len(), 3);

        assert!(matches!(
            received.try_recv(),
            Ok((id, Notification::HuntCompleted(_))) if id == player_id
        ));
    }

    #[tokio::test]
    async fn hunt_within_cooldown_fails_without_mutation() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let clock = Arc::new(ManualClock::at_secs(100));
        let player_id = PlayerId::new();
        let resolver = resolver(
            repo.clone(),
            quiet_notifier(),
            clock.clone(),
            Arc::new(FixedRandom(0)),
        );

        resolver.resolve(player_id, HuntMode::Manual).await.unwrap();
        let before = repo.get_player(player_id).await.unwrap();
        let zoo_before = repo.list_zoo_entries(player_id).await.unwrap();

        clock.set_secs(105);
        let result = resolver.resolve(player_id, HuntMode::Manual).await;

        assert!(matches!(
            result,
            Err(HuntError::CooldownActive { remaining_secs: 5 })
        ));
        assert_eq!(repo.get_player(player_id).await.unwrap(), before);
        assert_eq!(repo.list_zoo_entries(player_id).await.unwrap(), zoo_before);

        clock.set_secs(110);
        assert!(resolver.resolve(player_id, HuntMode::Manual).await.is_ok());
    }

    #[tokio::test]
    async fn automated_hunt_deducts_cost_from_reward() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player_id = PlayerId::new();
        let mut first_hunt = AchievementRecord::new(player_id, "First Hunt", 50);
        first_hunt.unlock();
        repo.commit(
            &ChangeSet::new(Player::new(player_id).with_balance(20))
                .with_achievements([first_hunt]),
        )
        .await
        .unwrap();
        let resolver = resolver(
            repo.clone(),
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(FixedRandom(0)),
        );

        let outcome = resolver.resolve(player_id, HuntMode::Automated).await.unwrap();

        assert_eq!(outcome.autohunt_cost, 20);
        assert_eq!(outcome.balance, 50);
    }

    #[tokio::test]
    async fn automated_hunt_requires_cost() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player = Player::new(PlayerId::new()).with_balance(15);
        repo.upsert_player(&player).await.unwrap();
        let resolver = resolver(
            repo.clone(),
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(FixedRandom(0)),
        );

        let result = resolver.resolve(player.id(), HuntMode::Automated).await;

        assert!(matches!(
            result,
            Err(HuntError::InsufficientFunds { balance: 15, cost: 20 })
        ));
        assert_eq!(repo.get_player(player.id()).await.unwrap(), Some(player));
    }

    #[tokio::test]
    async fn top_rolls_yield_last_legendary_creature() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let mut random = MockRandomPort::new();
        // Rarity ticket then creature index, both at the top of their range
        random.expect_gen_range().times(2).returning(|_, max| max);
        let resolver = resolver(
            repo,
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(random),
        );

        let outcome = resolver.resolve(PlayerId::new(), HuntMode::Manual).await.unwrap();

        assert_eq!(outcome.rarity, Rarity::Legendary);
        assert_eq!(outcome.creature.as_str(), "Dinosaur");
        assert_eq!(outcome.coins_earned, 150);
    }

    #[tokio::test]
    async fn boosts_double_coins_and_xp() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player = Player::new(PlayerId::new())
            .with_double_coins(true)
            .with_xp_boost(true);
        repo.upsert_player(&player).await.unwrap();
        // Ticket 91 lands in the Rare band, index 1 is Eagle
        let resolver = resolver(
            repo,
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(ScriptedRandom::new([91, 1])),
        );

        let outcome = resolver.resolve(player.id(), HuntMode::Manual).await.unwrap();

        assert_eq!(outcome.creature.as_str(), "Eagle");
        assert_eq!(outcome.rarity, Rarity::Rare);
        assert_eq!(outcome.coins_earned, 160);
        assert_eq!(outcome.xp_gained, 20);
    }

    #[tokio::test]
    async fn hunt_reports_level_ups() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player_id = PlayerId::new();
        let entry = ZooEntry::restore(
            player_id,
            CreatureName::new("Rabbit").unwrap(),
            Rarity::Common,
            9,
            95,
            1,
            0,
        )
        .unwrap();
        repo.upsert_zoo_entry(&entry).await.unwrap();
        let resolver = resolver(
            repo.clone(),
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(FixedRandom(0)),
        );

        let outcome = resolver.resolve(player_id, HuntMode::Manual).await.unwrap();

        assert!(matches!(
            outcome.progression.as_slice(),
            [ProgressionEvent::LevelUp { level: 2, .. }]
        ));
        // Tenth capture of the species unlocks Collector in the same commit
        let names: Vec<&str> = outcome.achievements.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First Hunt", "Collector"]);
        let stored = repo
            .get_zoo_entry(player_id, entry.creature())
            .await
            .unwrap()
            .unwrap();
        assert_eq!((stored.count(), stored.level(), stored.xp()), (10, 2, 5));
    }

    #[tokio::test]
    async fn failed_commit_leaves_no_partial_state() {
        let player_id = PlayerId::new();
        let mut repo = MockGameRepo::new();
        repo.expect_get_player()
            .returning(|id| Ok(Some(Player::new(id).with_balance(100))));
        repo.expect_get_zoo_entry().returning(|_, _| Ok(None));
        repo.expect_list_zoo_entries().returning(|_| Ok(Vec::new()));
        repo.expect_list_achievements().returning(|_| Ok(Vec::new()));
        repo.expect_commit()
            .times(1)
            .returning(|_| Err(RepoError::database("commit", "disk full")));
        repo.expect_upsert_player().never();
        repo.expect_upsert_zoo_entry().never();
        repo.expect_upsert_achievement().never();

        let mut notifier = MockNotificationPort::new();
        notifier.expect_notify().never();

        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(secs_to_time(1_000));

        let resolver = resolver(
            Arc::new(repo),
            Arc::new(notifier),
            Arc::new(clock),
            Arc::new(FixedRandom(0)),
        );

        let result = resolver.resolve(player_id, HuntMode::Manual).await;
        assert!(matches!(result, Err(HuntError::Repo(_))));
    }

    #[tokio::test]
    async fn notification_failure_keeps_committed_hunt() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(NotifyError::ChannelClosed));
        let player_id = PlayerId::new();
        let resolver = resolver(
            repo.clone(),
            Arc::new(notifier),
            Arc::new(FixedClock(secs_to_time(100))),
            Arc::new(FixedRandom(0)),
        );

        let outcome = resolver.resolve(player_id, HuntMode::Manual).await.unwrap();

        let player = repo.get_player(player_id).await.unwrap().unwrap();
        assert_eq!(player.balance(), outcome.balance);
        assert_eq!(player.last_hunt_at(), secs_to_time(100));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_hunts_on_one_player_serialize() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player_id = PlayerId::new();
        repo.upsert_player(&Player::new(player_id).with_balance(100))
            .await
            .unwrap();
        let resolver = Arc::new(resolver(
            repo.clone(),
            quiet_notifier(),
            Arc::new(SteppingClock(AtomicI64::new(1_000))),
            Arc::new(FixedRandom(0)),
        ));

        let mut handles = Vec::new();
        for i in 0..10 {
            let resolver = resolver.clone();
            let mode = if i % 2 == 0 { HuntMode::Manual } else { HuntMode::Automated };
            handles.push(tokio::spawn(async move {
                resolver.resolve(player_id, mode).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // 100 start + 5 x 50 manual + 5 x (50 - 20) automated + First Hunt 50 + Collector 200
        let player = repo.get_player(player_id).await.unwrap().unwrap();
        assert_eq!(player.balance(), 750);
        let entry = repo
            .get_zoo_entry(player_id, &CreatureName::new("Rabbit").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.count(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn only_one_hunt_per_cooldown_window() {
        let repo = Arc::new(InMemoryGameRepo::new());
        let player_id = PlayerId::new();
        let resolver = Arc::new(resolver(
            repo.clone(),
            quiet_notifier(),
            Arc::new(FixedClock(secs_to_time(1_000))),
            Arc::new(FixedRandom(0)),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolver = resolver.clone();
            handles.push(tokio::spawn(async move {
                resolver.resolve(player_id, HuntMode::Manual).await
            }));
        }
        let mut succeeded = 0;
        let mut on_cooldown = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(HuntError::CooldownActive { .. }) => on_cooldown += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(on_cooldown, 7);
        assert_eq!(repo.get_player(player_id).await.unwrap().unwrap().balance(), 100);
    }
}
