//! Player aggregate - balance, cooldown timestamps and active boosts
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: balance is only changed through methods that keep it
//!   non-negative
//! - **Valid by construction**: `new()` yields the defaults of a first interaction
//! - **Builder pattern**: Fluent API for restoring persisted state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DAILY_COOLDOWN_SECS, HUNT_COOLDOWN_SECS};
use crate::error::DomainError;
use crate::PlayerId;

/// A player of the game.
///
/// # Invariants
///
/// - `balance` is never negative (unsigned, debits are checked)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: PlayerId,
    balance: u64,
    last_daily_claim: DateTime<Utc>,
    last_hunt_at: DateTime<Utc>,
    xp_boost_active: bool,
    double_coins_active: bool,
    autohunt_enabled: bool,
}

impl Player {
    /// Create a player with zero balance, epoch timestamps and all flags off.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            balance: 0,
            last_daily_claim: DateTime::<Utc>::UNIX_EPOCH,
            last_hunt_at: DateTime::<Utc>::UNIX_EPOCH,
            xp_boost_active: false,
            double_coins_active: false,
            autohunt_enabled: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_last_daily_claim(mut self, at: DateTime<Utc>) -> Self {
        self.last_daily_claim = at;
        self
    }

    pub fn with_last_hunt_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_hunt_at = at;
        self
    }

    pub fn with_xp_boost(mut self, active: bool) -> Self {
        self.xp_boost_active = active;
        self
    }

    pub fn with_double_coins(mut self, active: bool) -> Self {
        self.double_coins_active = active;
        self
    }

    pub fn with_autohunt(mut self, enabled: bool) -> Self {
        self.autohunt_enabled = enabled;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn last_daily_claim(&self) -> DateTime<Utc> {
        self.last_daily_claim
    }

    pub fn last_hunt_at(&self) -> DateTime<Utc> {
        self.last_hunt_at
    }

    pub fn xp_boost_active(&self) -> bool {
        self.xp_boost_active
    }

    pub fn double_coins_active(&self) -> bool {
        self.double_coins_active
    }

    pub fn autohunt_enabled(&self) -> bool {
        self.autohunt_enabled
    }

    // =========================================================================
    // Cooldowns
    // =========================================================================

    /// Seconds left before another hunt is allowed, or `None` if ready.
    pub fn hunt_cooldown_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        cooldown_remaining(self.last_hunt_at, now, HUNT_COOLDOWN_SECS)
    }

    /// Seconds left before the next daily claim, or `None` if ready.
    pub fn daily_cooldown_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        cooldown_remaining(self.last_daily_claim, now, DAILY_COOLDOWN_SECS)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Apply the economics of one hunt: pay `cost`, earn `coins`, stamp the time.
    ///
    /// The cost is charged even when `coins < cost`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` if the balance cannot cover `cost`;
    /// the player is left untouched.
    pub fn settle_hunt(
        &mut self,
        coins: u64,
        cost: u64,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let after_cost = self.balance.checked_sub(cost).ok_or_else(|| {
            DomainError::constraint(format!(
                "balance {} cannot cover cost {}",
                self.balance, cost
            ))
        })?;
        self.balance = after_cost.saturating_add(coins);
        self.last_hunt_at = at;
        Ok(())
    }

    pub fn claim_daily(&mut self, reward: u64, at: DateTime<Utc>) {
        self.credit(reward);
        self.last_daily_claim = at;
    }

    pub fn set_autohunt(&mut self, enabled: bool) {
        self.autohunt_enabled = enabled;
    }
}

fn cooldown_remaining(last: DateTime<Utc>, now: DateTime<Utc>, cooldown_secs: i64) -> Option<i64> {
    let elapsed = now.signed_duration_since(last).num_seconds();
    if elapsed < cooldown_secs {
        Some(cooldown_secs - elapsed)
    } else {
        None
    }
}
