//! HTTP route handlers and router configuration

mod admin;
mod convert;
mod heatmap;
mod sql;
mod templates;

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::body::Bytes;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use heatmap::{CATEGORICAL_DIMENSIONS, DATE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};

/// Build the main application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(admin::health))
        // Raw read-only SQL
        .route("/execute_sql", post(sql::execute_sql))
        // Template-backed listings
        .route("/get_columns_table", get(templates::get_columns_table))
        .route("/get_filters", get(templates::get_filters))
        // GeoJSON endpoints
        .route(
            "/generate_heatmap_byfilter",
            post(heatmap::generate_heatmap_byfilter),
        )
        .route("/convert", post(convert::convert))
        .with_state(state.clone());

    // Add middleware
    router = router.layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if state.config.cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Parse a JSON object body; `None` when the body is empty
fn json_object(body: &Bytes) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<serde_json::Value>(body)? {
        serde_json::Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

/// String parameter `key`, or `MissingParameter(message)`
fn required_str<'a>(
    body: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
    message: &str,
) -> Result<&'a str> {
    body.get(key)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ServerError::missing(message))
}
