//! Integration tests for cache configuration

use std::path::PathBuf;

use ecscache_runtime::CacheConfig;
use ecscache_runtime::config::{DEFAULT_SAVE_INTERVAL, ENV_DIR, ENV_ENABLED, ENV_SAVE_INTERVAL};

#[test]
fn lookup_overrides_defaults() {
    let config = CacheConfig::from_lookup(|key| match key {
        ENV_ENABLED => Some("no".to_owned()),
        ENV_DIR => Some("/srv/ecscache".to_owned()),
        _ => None,
    });
    assert!(!config.enabled);
    assert_eq!(config.cache_dir, PathBuf::from("/srv/ecscache"));
    assert_eq!(config.save_interval, DEFAULT_SAVE_INTERVAL);
}

#[test]
fn invalid_interval_keeps_default() {
    let config = CacheConfig::from_lookup(|key| {
        (key == ENV_SAVE_INTERVAL).then(|| "soon".to_owned())
    });
    assert_eq!(config.save_interval, DEFAULT_SAVE_INTERVAL);
    assert!(config.enabled);
}
