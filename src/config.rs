//! Configuration Module
//!
//! Validated cache parameters plus service configuration loaded from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default entry lifetime (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default pause between reaper sweeps (1 minute)
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 60;

// == Cache Config ==
/// Construction parameters of a [`TtlCache`](crate::cache::TtlCache).
///
/// Both durations must be non-zero. They are independent: the reaper may run
/// more or less often than the ttl window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    ttl: Duration,
    reap_interval: Duration,
}

impl CacheConfig {
    /// Builds a validated config, rejecting zero durations.
    pub fn new(ttl: Duration, reap_interval: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::Configuration(
                "ttl must be greater than zero".to_string(),
            ));
        }
        if reap_interval.is_zero() {
            return Err(CacheError::Configuration(
                "reap interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self { ttl, reap_interval })
    }

    /// Maximum age an entry may reach before it is no longer returned.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Pause between two background sweeps.
    pub fn reap_interval(&self) -> Duration {
        self.reap_interval
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            reap_interval: Duration::from_secs(DEFAULT_REAP_INTERVAL_SECS),
        }
    }
}

// == Service Config ==
/// Demo service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry lifetime in seconds
    pub cache_ttl: u64,
    /// Background reaper interval in seconds
    pub reap_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Entry lifetime in seconds (default: 300)
    /// - `REAP_INTERVAL` - Reaper frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            cache_ttl: parse_env("CACHE_TTL").unwrap_or(DEFAULT_TTL_SECS),
            reap_interval: parse_env("REAP_INTERVAL").unwrap_or(DEFAULT_REAP_INTERVAL_SECS),
            server_port: parse_env("SERVER_PORT").unwrap_or(3000),
        }
    }

    /// Converts the raw values into a validated [`CacheConfig`].
    pub fn cache_config(&self) -> Result<CacheConfig> {
        CacheConfig::new(
            Duration::from_secs(self.cache_ttl),
            Duration::from_secs(self.reap_interval),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL_SECS,
            reap_interval: DEFAULT_REAP_INTERVAL_SECS,
            server_port: 3000,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
