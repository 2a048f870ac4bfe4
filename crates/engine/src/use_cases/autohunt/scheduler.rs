//! Periodic automated hunts for every opted-in player.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use zoohunt_domain::{Player, PlayerId};

use crate::infrastructure::config::AutoHuntConfig;
use crate::infrastructure::player_locks::PlayerLocks;
use crate::infrastructure::ports::{
    AutoHuntStopReason, GameRepo, HuntMode, Notification, NotificationPort, RepoError,
};
use crate::use_cases::hunt::{HuntError, HuntResolver};
use crate::use_cases::notify_player;

use super::{AutoHuntError, AutoHuntRegistry};

/// Tally of one scheduler tick.
///
/// `attempted` counts players still enrolled once their lock was acquired;
/// it equals `hunted + skipped_cooldown + stopped + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attempted: usize,
    pub hunted: usize,
    pub skipped_cooldown: usize,
    /// Disabled between the snapshot and the hunt.
    pub skipped_disabled: usize,
    pub stopped: usize,
    pub failed: usize,
}

enum PlayerTick {
    Hunted,
    OnCooldown,
    NotEnrolled,
    Stopped,
    Failed,
}

pub struct AutoHuntScheduler {
    repo: Arc<dyn GameRepo>,
    hunts: Arc<HuntResolver>,
    notifier: Arc<dyn NotificationPort>,
    locks: Arc<PlayerLocks>,
    registry: AutoHuntRegistry,
    config: AutoHuntConfig,
}

impl AutoHuntScheduler {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        hunts: Arc<HuntResolver>,
        notifier: Arc<dyn NotificationPort>,
        locks: Arc<PlayerLocks>,
        config: AutoHuntConfig,
    ) -> Self {
        Self {
            repo,
            hunts,
            notifier,
            locks,
            registry: AutoHuntRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &AutoHuntRegistry {
        &self.registry
    }

    /// Opt a player in. Idempotent.
    pub async fn enable(&self, player_id: PlayerId) -> Result<(), AutoHuntError> {
        let _guard = self.locks.acquire(player_id).await;
        self.persist_enabled(player_id, true).await?;
        if self.registry.enable(player_id) {
            tracing::info!(player_id = %player_id, "Autohunt enabled");
        }
        Ok(())
    }

    /// Opt a player out. Idempotent.
    pub async fn disable(&self, player_id: PlayerId) -> Result<(), AutoHuntError> {
        let _guard = self.locks.acquire(player_id).await;
        self.persist_enabled(player_id, false).await?;
        if self.registry.disable(player_id) {
            tracing::info!(player_id = %player_id, "Autohunt disabled");
        }
        Ok(())
    }

    /// Flip the player's autohunt state and notify them. Returns the new state.
    pub async fn toggle(&self, player_id: PlayerId) -> Result<bool, AutoHuntError> {
        let enabled = {
            let _guard = self.locks.acquire(player_id).await;
            let current = self
                .repo
                .get_player(player_id)
                .await?
                .map(|p| p.autohunt_enabled())
                .unwrap_or(false);
            let enabled = !current;
            self.persist_enabled(player_id, enabled).await?;
            if enabled {
                self.registry.enable(player_id);
            } else {
                self.registry.disable(player_id);
            }
            enabled
        };

        tracing::info!(player_id = %player_id, enabled, "Autohunt toggled");
        let notification = if enabled {
            Notification::AutoHuntStarted
        } else {
            Notification::AutoHuntStopped {
                reason: AutoHuntStopReason::Requested,
            }
        };
        notify_player(self.notifier.as_ref(), player_id, notification).await;
        Ok(enabled)
    }

    /// Load every persisted opt-in into the registry. Returns how many were loaded.
    pub async fn restore(&self) -> Result<usize, AutoHuntError> {
        let players = self.repo.list_autohunt_players().await?;
        for player_id in &players {
            self.registry.enable(*player_id);
        }
        tracing::info!(count = players.len(), "Restored autohunt players");
        Ok(players.len())
    }

    /// Run one automated hunt for every registered player.
    ///
    /// Players are hunted concurrently, at most `max_concurrency` at a time.
    /// A failure for one player never affects the others.
    pub async fn tick(self: &Arc<Self>) -> TickReport {
        let players = self.registry.snapshot();
        let mut report = TickReport::default();
        if players.is_empty() {
            return report;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();
        for player_id in players {
            let scheduler = Arc::clone(self);
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return PlayerTick::Failed;
                };
                scheduler.hunt_for(player_id).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let tick = joined.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Autohunt task aborted");
                PlayerTick::Failed
            });
            match tick {
                PlayerTick::NotEnrolled => {
                    report.skipped_disabled += 1;
                    continue;
                }
                PlayerTick::Hunted => report.hunted += 1,
                PlayerTick::OnCooldown => report.skipped_cooldown += 1,
                PlayerTick::Stopped => report.stopped += 1,
                PlayerTick::Failed => report.failed += 1,
            }
            report.attempted += 1;
        }
        let pruned_locks = self.locks.prune();

        tracing::debug!(
            attempted = report.attempted,
            hunted = report.hunted,
            skipped_cooldown = report.skipped_cooldown,
            stopped = report.stopped,
            failed = report.failed,
            pruned_locks,
            "Autohunt tick complete"
        );
        report
    }

    /// Run ticks every configured interval until `cancel` fires.
    ///
    /// Ticks never overlap; intervals missed while a tick runs are skipped.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = self.config.interval;
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(interval_secs = period.as_secs(), "Starting autohunt scheduler");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Autohunt scheduler shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.tick().await;
                    }
                }
            }
        })
    }

    async fn hunt_for(&self, player_id: PlayerId) -> PlayerTick {
        let guard = self.locks.acquire(player_id).await;
        if !self.registry.contains(player_id) {
            tracing::debug!(player_id = %player_id, "Autohunt disabled before hunt, skipping");
            return PlayerTick::NotEnrolled;
        }

        match self.hunts.resolve_locked(player_id, HuntMode::Automated).await {
            Ok(outcome) => {
                drop(guard);
                notify_player(
                    self.notifier.as_ref(),
                    player_id,
                    Notification::HuntCompleted(outcome),
                )
                .await;
                PlayerTick::Hunted
            }
            Err(HuntError::CooldownActive { remaining_secs }) => {
                tracing::debug!(player_id = %player_id, remaining_secs, "Autohunt skipped, on cooldown");
                PlayerTick::OnCooldown
            }
            Err(HuntError::InsufficientFunds { balance, cost }) => {
                let persisted = self.persist_enabled(player_id, false).await;
                self.registry.disable(player_id);
                drop(guard);

                if let Err(e) = persisted {
                    tracing::error!(player_id = %player_id, error = %e, "Failed to persist autohunt stop");
                }
                tracing::info!(player_id = %player_id, balance, cost, "Autohunt stopped, insufficient funds");
                notify_player(
                    self.notifier.as_ref(),
                    player_id,
                    Notification::AutoHuntStopped {
                        reason: AutoHuntStopReason::InsufficientFunds,
                    },
                )
                .await;
                PlayerTick::Stopped
            }
            Err(HuntError::Repo(e)) => {
                tracing::error!(player_id = %player_id, error = %e, "Autohunt failed");
                PlayerTick::Failed
            }
        }
    }

    /// Caller must hold the player's lock.
    async fn persist_enabled(&self, player_id: PlayerId, enabled: bool) -> Result<(), RepoError> {
        let mut player = self
            .repo
            .get_player(player_id)
            .await?
            .unwrap_or_else(|| Player::new(player_id));
        player.set_autohunt(enabled);
        self.repo.upsert_player(&player).await
    }
}
