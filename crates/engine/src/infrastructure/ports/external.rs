//! External service port traits (player notifications).

use async_trait::async_trait;
use zoohunt_domain::PlayerId;

use super::error::NotifyError;
use super::types::Notification;

// =============================================================================
// Notifications
// =============================================================================

/// Fire-and-forget delivery of game events to a player.
///
/// Callers log delivery failures; a failed delivery never undoes the state
/// change it reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, player_id: PlayerId, notification: Notification)
        -> Result<(), NotifyError>;
}
