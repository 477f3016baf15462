//! Raw SQL endpoint: /execute_sql

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gq_core::{project_inferred, QueryClassifier, QueryVerdict};
use std::sync::Arc;

use super::{json_object, required_str};

const QUERY_NOT_PROVIDED: &str = "Query not provided";

/// POST /execute_sql
///
/// Body: `{"query": "...", "geojson": false}`. Returns the rows as an array
/// of objects, or a FeatureCollection when `geojson` is true and the result
/// has a longitude, latitude and value column.
pub async fn execute_sql(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    let body = json_object(&body)?.ok_or_else(|| ServerError::missing(QUERY_NOT_PROVIDED))?;
    let query = required_str(&body, "query", QUERY_NOT_PROVIDED)?;
    let as_geojson = body
        .get("geojson")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    match state.classifier.classify(query) {
        QueryVerdict::Allowed => {}
        QueryVerdict::RejectedProhibitedKeyword(keyword) => {
            return Err(ServerError::ProhibitedQuery { keyword })
        }
        QueryVerdict::RejectedNotSelect => return Err(ServerError::NotSelectQuery),
        QueryVerdict::RejectedMultiStatement => return Err(ServerError::MultiStatement),
    }

    let table = state.source.execute(query).await?;
    tracing::info!(rows = table.row_count(), geojson = as_geojson, "execute_sql served");

    if as_geojson {
        let collection = project_inferred(&table)?;
        return Ok(Json(collection).into_response());
    }
    Ok(Json(table).into_response())
}
