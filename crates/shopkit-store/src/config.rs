//! Store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the SQLite catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the database file. Created if missing.
    pub path: PathBuf,
    /// Connection pool size.
    pub max_connections: u32,
    /// How long a connection waits on a locked database.
    pub busy_timeout_seconds: u64,
    /// Use write-ahead logging.
    pub enable_wal: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("shopkit.db"),
            max_connections: 10,
            busy_timeout_seconds: 30,
            enable_wal: true,
        }
    }
}

impl StoreConfig {
    /// Default configuration against a specific database file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.max_connections, 10);
        assert!(config.enable_wal);
    }

    #[test]
    fn test_at_keeps_defaults() {
        let config = StoreConfig::at("/tmp/x.db");
        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.busy_timeout_seconds, 30);
    }
}
