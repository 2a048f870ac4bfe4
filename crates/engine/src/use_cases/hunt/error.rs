//! Hunt errors.

use crate::infrastructure::ports::RepoError;

/// Errors that can occur while resolving a hunt.
///
/// None of these leave partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum HuntError {
    #[error("Hunt on cooldown, {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: i64 },
    #[error("Insufficient funds: balance {balance}, cost {cost}")]
    InsufficientFunds { balance: u64, cost: u64 },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
