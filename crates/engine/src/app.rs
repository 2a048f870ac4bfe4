//! Application state and composition.

use std::sync::Arc;

use zoohunt_domain::AchievementRegistry;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::AutoHuntConfig,
    player_locks::PlayerLocks,
    ports::{ClockPort, GameRepo, NotificationPort, RandomPort},
};
use crate::use_cases::{
    AchievementEvaluator, AutoHuntScheduler, DailyReward, HuntResolver, PlayerQueries,
};

/// Main application state.
///
/// Every use case shares one repository and one [`PlayerLocks`] table, so
/// per-player exclusion holds across hunts, daily claims and autohunt toggles.
pub struct App {
    pub repo: Arc<dyn GameRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub hunt: Arc<HuntResolver>,
    pub autohunt: Arc<AutoHuntScheduler>,
    pub achievements: Arc<AchievementEvaluator>,
    pub daily: Arc<DailyReward>,
    pub players: Arc<PlayerQueries>,
}

impl App {
    /// Wire the application with the system clock and randomness.
    pub fn new(
        repo: Arc<dyn GameRepo>,
        notifier: Arc<dyn NotificationPort>,
        autohunt: AutoHuntConfig,
    ) -> Self {
        Self::with_ports(
            repo,
            notifier,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            autohunt,
        )
    }

    pub fn with_ports(
        repo: Arc<dyn GameRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        autohunt: AutoHuntConfig,
    ) -> Self {
        let locks = Arc::new(PlayerLocks::new());

        let achievements = Arc::new(AchievementEvaluator::new(
            repo.clone(),
            notifier.clone(),
            locks.clone(),
            AchievementRegistry::standard(),
        ));
        let hunt = Arc::new(HuntResolver::new(
            repo.clone(),
            achievements.clone(),
            notifier.clone(),
            clock.clone(),
            random,
            locks.clone(),
        ));
        let autohunt = Arc::new(AutoHuntScheduler::new(
            repo.clone(),
            hunt.clone(),
            notifier.clone(),
            locks.clone(),
            autohunt,
        ));
        let daily = Arc::new(DailyReward::new(
            repo.clone(),
            notifier,
            clock,
            locks.clone(),
        ));
        let players = Arc::new(PlayerQueries::new(repo.clone(), achievements.clone(), locks));

        Self {
            repo,
            use_cases: UseCases {
                hunt,
                autohunt,
                achievements,
                daily,
                players,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, ManualClock};
    use crate::infrastructure::memory::InMemoryGameRepo;
    use crate::infrastructure::notifier::ChannelNotifier;
    use crate::infrastructure::ports::{HuntMode, Notification};
    use crate::use_cases::HuntError;
    use zoohunt_domain::PlayerId;

    #[tokio::test]
    async fn use_cases_share_player_state() {
        let (notifier, mut received) = ChannelNotifier::channel();
        let clock = Arc::new(ManualClock::at_secs(100_000));
        let app = App::with_ports(
            Arc::new(InMemoryGameRepo::new()),
            Arc::new(notifier),
            clock.clone(),
            Arc::new(FixedRandom(0)),
            AutoHuntConfig::default(),
        );
        let player_id = PlayerId::new();

        app.use_cases.players.start(player_id).await.unwrap();
        app.use_cases.daily.claim(player_id).await.unwrap();
        assert!(app.use_cases.autohunt.toggle(player_id).await.unwrap());

        let report = app.use_cases.autohunt.tick().await;
        assert_eq!(report.hunted, 1);

        // Daily 100, then automated hunt: -20 + 50 + First Hunt 50
        assert_eq!(app.use_cases.players.balance(player_id).await.unwrap(), 180);
        let manual = app.use_cases.hunt.resolve(player_id, HuntMode::Manual).await;
        assert!(matches!(manual, Err(HuntError::CooldownActive { remaining_secs: 10 })));

        clock.set_secs(100_010);
        app.use_cases.hunt.resolve(player_id, HuntMode::Manual).await.unwrap();
        assert_eq!(app.use_cases.players.zoo(player_id).await.unwrap()[0].count(), 2);

        let kinds: Vec<&'static str> = std::iter::from_fn(|| received.try_recv().ok())
            .map(|(_, n)| match n {
                Notification::HuntCompleted(_) => "hunt",
                Notification::AutoHuntStarted => "started",
                Notification::AutoHuntStopped { .. } => "stopped",
                Notification::DailyClaimed { .. } => "daily",
                Notification::AchievementsUnlocked { .. } => "achievements",
            })
            .collect();
        assert_eq!(kinds, vec!["daily", "started", "hunt", "hunt"]);
    }
}
