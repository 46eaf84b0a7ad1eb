//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Pick the store file location and relay endpoint for host layers.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.

use crate::notify::RelayConfig;
use std::path::PathBuf;

/// Overrides the store file path.
pub const DB_PATH_ENV: &str = "QUICKLIST_DB_PATH";
/// Overrides the relay endpoint URL.
pub const RELAY_URL_ENV: &str = "QUICKLIST_RELAY_URL";
/// Store file name used when no override is set.
pub const DEFAULT_DB_FILE_NAME: &str = "quicklist.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub relay: RelayConfig,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let mut relay = RelayConfig::default();
        if let Some(endpoint) = non_blank(RELAY_URL_ENV) {
            relay.endpoint = endpoint;
        }

        Self { db_path, relay }
    }
}
