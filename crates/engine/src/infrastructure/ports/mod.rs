//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Player notifications (could swap logs -> chat transport)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::GameRepo;

// =============================================================================
// Types from types module (re-export for visibility)
// =============================================================================
pub use types::{AutoHuntStopReason, ChangeSet, HuntMode, HuntOutcome, Notification};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::NotificationPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockGameRepo;

#[cfg(test)]
pub use external::MockNotificationPort;

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{NotifyError, RepoError};
