//! Notification adapters.
//!
//! `TracingNotifier` writes every notification to the log. `ChannelNotifier`
//! forwards them to a presentation consumer (chat transport, UI) over an mpsc
//! channel.

use async_trait::async_trait;
use tokio::sync::mpsc;
use zoohunt_domain::PlayerId;

use crate::infrastructure::ports::{Notification, NotificationPort, NotifyError};

/// Logs notifications instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationPort for TracingNotifier {
    async fn notify(
        &self,
        player_id: PlayerId,
        notification: Notification,
    ) -> Result<(), NotifyError> {
        match &notification {
            Notification::HuntCompleted(outcome) => tracing::info!(
                player_id = %player_id,
                mode = %outcome.mode,
                creature = %outcome.creature,
                rarity = %outcome.rarity,
                coins = outcome.coins_earned,
                balance = outcome.balance,
                level_ups = outcome.progression.len(),
                achievements = outcome.achievements.len(),
                "Hunt completed"
            ),
            Notification::AutoHuntStarted => {
                tracing::info!(player_id = %player_id, "Autohunt started")
            }
            Notification::AutoHuntStopped { reason } => {
                tracing::info!(player_id = %player_id, reason = ?reason, "Autohunt stopped")
            }
            Notification::DailyClaimed { reward, balance } => tracing::info!(
                player_id = %player_id,
                reward,
                balance,
                "Daily reward claimed"
            ),
            Notification::AchievementsUnlocked { unlocked } => tracing::info!(
                player_id = %player_id,
                count = unlocked.len(),
                "Achievements unlocked"
            ),
        }
        Ok(())
    }
}

/// Forwards notifications to an unbounded mpsc receiver.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<(PlayerId, Notification)>,
}

impl ChannelNotifier {
    pub fn new(sender: mpsc::UnboundedSender<(PlayerId, Notification)>) -> Self {
        Self { sender }
    }

    /// Create a notifier together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(PlayerId, Notification)>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl NotificationPort for ChannelNotifier {
    async fn notify(
        &self,
        player_id: PlayerId,
        notification: Notification,
    ) -> Result<(), NotifyError> {
        self.sender
            .send((player_id, notification))
            .map_err(|_| NotifyError::ChannelClosed)
    }
}
