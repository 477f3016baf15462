//! SQLite data source implementation

use async_trait::async_trait;
use gq_core::{ResultTable, Value};
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use tracing::debug;

use super::DataSource;
use crate::config::SourceConfig;
use crate::DataError;

/// SQLite data source; every query gets its own connection
#[derive(Debug, Clone)]
pub struct SqliteSource {
    config: SourceConfig,
}

impl SqliteSource {
    /// Create a new SQLite data source, checking the database can be opened
    pub async fn new(config: SourceConfig) -> Result<Self, DataError> {
        let source = Self { config };

        let config = source.config.clone();
        tokio::task::spawn_blocking(move || open_connection(&config).map(|_| ())).await??;

        Ok(source)
    }
}

fn open_connection(config: &SourceConfig) -> Result<Connection, DataError> {
    let access = if config.read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
    };
    let flags = access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(&config.path, flags).map_err(|e| {
        DataError::Sqlite(format!(
            "Failed to open SQLite database {}: {}",
            config.path.display(),
            e
        ))
    })?;
    conn.busy_timeout(config.busy_timeout())?;
    Ok(conn)
}

/// Run `query` on `conn` and collect the full result
fn run_query(conn: &Connection, query: &str) -> Result<ResultTable, DataError> {
    let mut stmt = conn.prepare(query)?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut table = ResultTable::new(columns);

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for col_idx in 0..width {
            values.push(cell_value(row.get_ref(col_idx)?));
        }
        table.push_row(values)?;
    }

    Ok(table)
}

fn cell_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn execute(&self, query: &str) -> Result<ResultTable, DataError> {
        let config = self.config.clone();
        let query = query.to_string();

        let table = tokio::task::spawn_blocking(move || {
            let conn = open_connection(&config)?;
            run_query(&conn, &query)
        })
        .await??;

        debug!(
            source = self.source_name(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "query executed"
        );
        Ok(table)
    }

    fn source_name(&self) -> &str {
        self.config
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.db")
    }
}
