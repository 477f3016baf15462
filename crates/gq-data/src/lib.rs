//! Data sources and query templates for the geo query service

pub mod config;
pub mod sample;
pub mod sources;
pub mod templates;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::SourceConfig;
pub use sources::{DataSource, SqliteSource};
pub use templates::TemplateStore;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Sqlite(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        DataError::Sqlite(error.to_string())
    }
}

impl From<gq_core::CoreError> for DataError {
    fn from(error: gq_core::CoreError) -> Self {
        DataError::Other(error.to_string())
    }
}
