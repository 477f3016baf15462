//! Record conversion endpoint: /convert

use crate::error::{Result, ServerError};
use axum::body::Bytes;
use axum::Json;
use gq_core::{project_records, FeatureCollection, Record};

/// POST /convert
///
/// Body: an array of objects with exactly three keys each. Roles are
/// resolved per object from its key names.
pub async fn convert(body: Bytes) -> Result<Json<FeatureCollection>> {
    let records: Vec<Record> = serde_json::from_slice(&body).map_err(|e| {
        ServerError::MalformedItem(format!("expected an array of objects: {}", e))
    })?;

    let collection = project_records(&records)?;
    tracing::info!(
        items = records.len(),
        features = collection.features.len(),
        "convert served"
    );
    Ok(Json(collection))
}
