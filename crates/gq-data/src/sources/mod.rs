pub mod sqlite_source;

pub use sqlite_source::SqliteSource;

use async_trait::async_trait;
use gq_core::ResultTable;

use crate::DataError;

/// Something that can run a query string and hand back a result table
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Execute `query` and collect every row
    async fn execute(&self, query: &str) -> Result<ResultTable, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
