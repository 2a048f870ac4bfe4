//! Error types for port operations.

/// Storage failures surfaced by [`super::GameRepo`] adapters.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The backing store rejected or failed an operation.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored row could not be mapped to or from a domain value.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A write broke a schema constraint (CHECK, UNIQUE, NOT NULL).
    #[error("Constraint violation in {operation}: {message}")]
    ConstraintViolation {
        operation: &'static str,
        message: String,
    },
}

impl RepoError {
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn constraint(operation: &'static str, message: impl ToString) -> Self {
        Self::ConstraintViolation {
            operation,
            message: message.to_string(),
        }
    }
}

/// Errors from delivering a notification to a player.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification channel closed")]
    ChannelClosed,
}
