//! Configuration for cache persistence.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Environment variable toggling persistence.
pub const ENV_ENABLED: &str = "ECSCACHE_ENABLED";
/// Environment variable overriding the snapshot directory.
pub const ENV_DIR: &str = "ECSCACHE_DIR";
/// Environment variable overriding the save interval.
pub const ENV_SAVE_INTERVAL: &str = "ECSCACHE_SAVE_INTERVAL";

/// Default number of blocks between periodic saves.
pub const DEFAULT_SAVE_INTERVAL: u64 = 100;

/// Configuration for cache persistence.
///
/// Controls whether snapshots are kept, where, and how often they are
/// refreshed while ingesting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether snapshots are loaded and saved (false = cache-less).
    pub enabled: bool,

    /// Directory holding snapshot files.
    pub cache_dir: PathBuf,

    /// Minimum watermark advance, in blocks, between periodic saves.
    pub save_interval: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: default_cache_dir(),
            save_interval: DEFAULT_SAVE_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration that never touches durable storage.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the snapshot directory.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Builder method to set the save interval. Zero saves after every event.
    #[must_use]
    pub fn with_save_interval(mut self, save_interval: u64) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ECSCACHE_ENABLED` - Persist snapshots (default: true)
    /// - `ECSCACHE_DIR` - Snapshot directory (default: platform data dir)
    /// - `ECSCACHE_SAVE_INTERVAL` - Blocks between saves (default: 100)
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`CacheConfig::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ENABLED) {
            match parse_bool(&raw) {
                Some(enabled) => config.enabled = enabled,
                None => warn!(var = ENV_ENABLED, value = %raw, "ignoring invalid boolean"),
            }
        }

        if let Some(raw) = lookup(ENV_DIR) {
            if raw.trim().is_empty() {
                warn!(var = ENV_DIR, "ignoring empty directory");
            } else {
                config.cache_dir = PathBuf::from(raw);
            }
        }

        if let Some(raw) = lookup(ENV_SAVE_INTERVAL) {
            match raw.trim().parse() {
                Ok(interval) => config.save_interval = interval,
                Err(_) => warn!(var = ENV_SAVE_INTERVAL, value = %raw, "ignoring invalid interval"),
            }
        }

        config
    }
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "ecscache")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| env::temp_dir().join("ecscache"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
