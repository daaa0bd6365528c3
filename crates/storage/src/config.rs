//! Open-time configuration for the storage engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default database location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./navcache.db";

/// Default schema version.
pub const DEFAULT_SCHEMA_VERSION: u32 = 1;

/// Cache keys longer than this are still stored but logged as a warning.
pub const DEFAULT_KEY_SOFT_LIMIT: usize = 100;

/// Storage engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the sled database.
    pub path: PathBuf,
    /// Schema version the store is opened with.
    pub version: u32,
    /// Use an in-memory database that is discarded when closed.
    #[serde(default)]
    pub temporary: bool,
    /// Soft length limit for cache keys.
    #[serde(default = "default_key_soft_limit")]
    pub key_soft_limit: usize,
}

fn default_key_soft_limit() -> usize {
    DEFAULT_KEY_SOFT_LIMIT
}

impl StorageConfig {
    /// Configuration for an on-disk database at `path`.
    pub fn new(path: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            path: path.into(),
            version,
            ..Self::default()
        }
    }

    /// Configuration for an in-memory database (for testing).
    pub fn temporary(version: u32) -> Self {
        Self {
            version,
            temporary: true,
            ..Self::default()
        }
    }

    /// Same location, different schema version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            version: DEFAULT_SCHEMA_VERSION,
            temporary: false,
            key_soft_limit: DEFAULT_KEY_SOFT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.path, PathBuf::from("./navcache.db"));
        assert_eq!(config.version, 1);
        assert!(!config.temporary);
        assert_eq!(config.key_soft_limit, 100);
    }

    #[test]
    fn test_builders() {
        let config = StorageConfig::new("/tmp/cache", 3);
        assert_eq!(config.path, PathBuf::from("/tmp/cache"));
        assert_eq!(config.version, 3);
        assert!(!config.temporary);

        let config = StorageConfig::temporary(7);
        assert!(config.temporary);
        assert_eq!(config.version, 7);

        let bumped = config.clone().with_version(8);
        assert_eq!(bumped.version, 8);
        assert_eq!(bumped.path, config.path);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        // Older config files only carry path and version.
        let config: StorageConfig =
            serde_json::from_str(r#"{"path":"./data/db","version":2}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("./data/db"));
        assert_eq!(config.version, 2);
        assert!(!config.temporary);
        assert_eq!(config.key_soft_limit, DEFAULT_KEY_SOFT_LIMIT);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = StorageConfig::new("./data/db", 4);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: StorageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
