//! Fixed game balance constants.
//!
//! These values are part of the game's economy and are not runtime-configurable.

/// Minimum seconds between two hunts for the same player.
pub const HUNT_COOLDOWN_SECS: i64 = 10;

/// Minimum seconds between two daily reward claims.
pub const DAILY_COOLDOWN_SECS: i64 = 86_400;

/// Seconds between two autohunt scheduler ticks.
pub const AUTOHUNT_INTERVAL_SECS: u64 = 30;

/// Coins charged for each automated hunt.
pub const AUTOHUNT_COST: u64 = 20;

/// Coins granted by a daily claim.
pub const DAILY_REWARD: u64 = 100;

/// Base coins for any hunt before rarity bonus and multipliers.
pub const BASE_HUNT_REWARD: u64 = 50;

/// Experience granted to the captured creature per hunt.
pub const XP_PER_HUNT: u32 = 10;

/// A creature at level `n` needs `n * LEVEL_XP_MULTIPLIER` xp to level up.
pub const LEVEL_XP_MULTIPLIER: u32 = 100;

/// Evolution happens every time a level multiple of this is reached.
pub const EVOLUTION_LEVEL_INTERVAL: u32 = 5;

/// Multiplier applied to coins while double coins is active.
pub const DOUBLE_COINS_MULTIPLIER: u64 = 2;

/// Multiplier applied to xp while the xp boost is active.
pub const XP_BOOST_MULTIPLIER: u32 = 2;

/// Ordered stage markers relayed with an evolution announcement.
///
/// An evolution to stage `s` reveals the first `min(s, len)` markers.
pub const EVOLUTION_MARKERS: [&str; 5] = ["🐣", "🐥", "🦅", "🦖", "🌟"];
