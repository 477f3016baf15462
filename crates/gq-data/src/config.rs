//! Data source configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to reach the SQLite database backing the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the database file
    pub path: PathBuf,

    /// Open the connection read-only
    pub read_only: bool,

    /// How long a query waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/measurements.db"),
            read_only: true,
            busy_timeout_ms: 5_000,
        }
    }
}

impl SourceConfig {
    /// Create a read-only configuration for the given database
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
