//! Application configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use zoohunt_domain::constants::AUTOHUNT_INTERVAL_SECS;

/// Which [`GameRepo`](crate::infrastructure::ports::GameRepo) implementation backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown store backend '{}', expected 'sqlite' or 'memory'", other),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storage backend: "sqlite" or "memory"
    pub store_backend: StoreBackend,
    /// SQLite database path (if using sqlite backend)
    pub sqlite_path: String,
    /// Autohunt scheduler configuration
    pub autohunt: AutoHuntConfig,
}

/// Autohunt scheduler configuration
#[derive(Debug, Clone)]
pub struct AutoHuntConfig {
    /// Max players hunted concurrently within one tick
    pub max_concurrency: usize,
    /// Time between ticks
    pub interval: Duration,
}

impl Default for AutoHuntConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            interval: Duration::from_secs(AUTOHUNT_INTERVAL_SECS),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AutoHuntConfig::default();

        let max_concurrency: usize = match lookup("AUTOHUNT_MAX_CONCURRENCY") {
            Some(raw) => raw
                .parse()
                .context("AUTOHUNT_MAX_CONCURRENCY must be a positive integer")?,
            None => defaults.max_concurrency,
        };
        if max_concurrency == 0 {
            bail!("AUTOHUNT_MAX_CONCURRENCY must be at least 1");
        }

        let interval = match lookup("AUTOHUNT_INTERVAL_SECONDS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .context("AUTOHUNT_INTERVAL_SECONDS must be a number of seconds")?,
            ),
            None => defaults.interval,
        };
        if interval.is_zero() {
            bail!("AUTOHUNT_INTERVAL_SECONDS must be at least 1");
        }

        Ok(Self {
            store_backend: lookup("STORE_BACKEND")
                .unwrap_or_else(|| "sqlite".to_string())
                .parse()
                .context("STORE_BACKEND is invalid")?,
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "./data/zoohunt.db".to_string()),
            autohunt: AutoHuntConfig {
                max_concurrency,
                interval,
            },
        })
    }
}
