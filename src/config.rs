//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Longest sweep interval accepted by [`Config::validate`], in seconds.
pub const MAX_SWEEP_INTERVAL: u64 = 24 * 60 * 60;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lower-case every key before it reaches the store
    pub case_insensitive_keys: bool,
    /// Background sweep interval in seconds, 0 disables the sweeper
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AREA_CACHE_CASE_INSENSITIVE` - Normalize keys to lower case (default: true)
    /// - `AREA_CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    pub fn from_env() -> Self {
        Self {
            case_insensitive_keys: env::var("AREA_CACHE_CASE_INSENSITIVE")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            sweep_interval: env::var("AREA_CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Checks that every value is within its accepted range.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval > MAX_SWEEP_INTERVAL {
            return Err(CacheError::InvalidConfig(format!(
                "sweep interval of {}s exceeds maximum of {}s",
                self.sweep_interval, MAX_SWEEP_INTERVAL
            )));
        }
        Ok(())
    }

    /// Returns the sweep interval, or None when the sweeper is disabled.
    pub fn sweep_period(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_insensitive_keys: true,
            sweep_interval: 0,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
