//! Use cases - user story orchestration over the domain and ports.

pub mod achievements;
pub mod autohunt;
pub mod daily;
pub mod hunt;
pub mod player;

pub use achievements::AchievementEvaluator;
pub use autohunt::{AutoHuntError, AutoHuntRegistry, AutoHuntScheduler, TickReport};
pub use daily::{DailyClaim, DailyError, DailyReward};
pub use hunt::{HuntError, HuntResolver};
pub use player::PlayerQueries;

use zoohunt_domain::PlayerId;

use crate::infrastructure::ports::{Notification, NotificationPort};

/// Deliver a notification, logging instead of failing.
pub(crate) async fn notify_player(
    notifier: &dyn NotificationPort,
    player_id: PlayerId,
    notification: Notification,
) {
    if let Err(e) = notifier.notify(player_id, notification).await {
        tracing::warn!(player_id = %player_id, error = %e, "Failed to deliver notification");
    }
}
