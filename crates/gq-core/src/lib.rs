//! Core query gate and geospatial projection
//!
//! This crate holds the request-independent logic of the service: the
//! query safety classifier, categorical and date filtering over result
//! tables, column role inference and the GeoJSON projector. Nothing here
//! performs I/O.

pub mod classify;
pub mod filter;
pub mod geo;
pub mod roles;
pub mod table;
pub mod value;

use thiserror::Error;

// Re-exports
pub use classify::{
    Denylist, DenylistRevision, PrefixGate, QueryClassifier, QueryVerdict, SingleStatementGate,
};
pub use filter::{apply_filter, apply_filters, filter_date_range, DateRange, FilterMode, FilterSpec};
pub use geo::{project, project_inferred, project_records, Record};
pub use geojson::FeatureCollection;
pub use roles::{resolve_roles, ColumnRoles};
pub use table::{ResultTable, Row};
pub use value::{is_valid, Value};

/// Errors raised while filtering or projecting a result
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    SchemaShape(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Malformed item: {0}")]
    MalformedItem(String),
}
