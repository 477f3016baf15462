//! Server error types and their HTTP responses
//!
//! Every failure a request can hit becomes `400 {"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gq_core::CoreError;
use gq_data::DataError;
use serde::Serialize;
use thiserror::Error;

/// Result alias for handlers
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type covering every request-level failure
#[derive(Error, Debug)]
pub enum ServerError {
    /// A required request parameter was absent
    #[error("{0}")]
    MissingParameter(String),

    /// Query starts with a denylisted keyword
    #[error("Prohibited query type")]
    ProhibitedQuery { keyword: String },

    /// Query is not a SELECT
    #[error("Only SELECT queries are allowed")]
    NotSelectQuery,

    /// Query holds more than one statement
    #[error("Only a single statement is allowed")]
    MultiStatement,

    /// Filtering, role resolution or projection failed
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Query execution or template loading failed
    #[error("{0}")]
    DataSource(#[from] DataError),

    /// Request body was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Conversion input had the wrong shape
    #[error("{0}")]
    MalformedItem(String),
}

impl ServerError {
    /// Short name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::MissingParameter(_) => "missing_parameter",
            ServerError::ProhibitedQuery { .. } => "prohibited_query",
            ServerError::NotSelectQuery => "not_select_query",
            ServerError::MultiStatement => "multi_statement",
            ServerError::Core(CoreError::DateParse { .. }) => "date_parse",
            ServerError::Core(CoreError::MalformedItem(_)) => "malformed_item",
            ServerError::Core(_) => "schema_shape",
            ServerError::DataSource(_) => "data_source",
            ServerError::Json(_) => "json_parse",
            ServerError::MalformedItem(_) => "malformed_item",
        }
    }

    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingParameter(_)
            | ServerError::ProhibitedQuery { .. }
            | ServerError::NotSelectQuery
            | ServerError::MultiStatement
            | ServerError::Core(_)
            | ServerError::DataSource(_)
            | ServerError::Json(_)
            | ServerError::MalformedItem(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Create a missing parameter error
    pub fn missing(msg: impl Into<String>) -> Self {
        ServerError::MissingParameter(msg.into())
    }
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(
            status = status.as_u16(),
            kind = self.kind(),
            error = %self,
            "request failed"
        );

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ServerError::ProhibitedQuery { keyword: "drop".into() }.to_string(),
            "Prohibited query type"
        );
        assert_eq!(ServerError::NotSelectQuery.to_string(), "Only SELECT queries are allowed");
        assert_eq!(
            ServerError::Core(CoreError::SchemaShape("need 3 columns".into())).to_string(),
            "need 3 columns"
        );
    }

    #[test]
    fn test_everything_is_bad_request() {
        let errors = [
            ServerError::missing("Parameter is missing"),
            ServerError::MultiStatement,
            ServerError::DataSource(DataError::Sqlite("no such table: x".into())),
            ServerError::MalformedItem("item 0".into()),
        ];
        for error in errors {
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
