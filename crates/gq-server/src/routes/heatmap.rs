//! Filtered heatmap endpoint: /generate_heatmap_byfilter

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use gq_core::{
    apply_filters, filter_date_range, project, ColumnRoles, DateRange, FeatureCollection,
    FilterSpec,
};
use gq_data::templates::HEATMAP;
use std::sync::Arc;

use super::{json_object, required_str};

/// Longitude column produced by the heatmap template
pub const LONGITUDE_COLUMN: &str = "CLIENT_LONGITUDE";

/// Latitude column produced by the heatmap template
pub const LATITUDE_COLUMN: &str = "CLIENT_LATITUDE";

/// Timestamp column the date range applies to
pub const DATE_COLUMN: &str = "TEST_DATE";

/// Categorical columns filterable by exact value, in application order
pub const CATEGORICAL_DIMENSIONS: [&str; 5] =
    ["TEST_CARRIER_A", "BRAND", "DEVICE", "HARDWARE", "MODEL"];

/// Keys that may name the value column, in lookup order
const INTENSITY_KEYS: [&str; 2] = ["intensity", "column"];

const PARAMETER_MISSING: &str = "Parameter is missing";

/// POST /generate_heatmap_byfilter
///
/// Runs the heatmap template with the chosen value column, narrows the rows
/// by date range and categorical filters, and returns them as points.
pub async fn generate_heatmap_byfilter(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FeatureCollection>> {
    let body = json_object(&body)?.ok_or_else(|| ServerError::missing(PARAMETER_MISSING))?;

    let start_date = required_str(&body, "start_date", PARAMETER_MISSING)?;
    let end_date = required_str(&body, "end_date", PARAMETER_MISSING)?;

    let mut filters = FilterSpec::new();
    for dimension in CATEGORICAL_DIMENSIONS {
        let value = required_str(&body, dimension, PARAMETER_MISSING)?;
        filters.insert(dimension.to_string(), value.to_string());
    }

    // Older clients send the value column as `column`
    let intensity = INTENSITY_KEYS
        .iter()
        .find_map(|key| {
            body.get(*key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .ok_or_else(|| ServerError::missing(PARAMETER_MISSING))?;

    let range = DateRange::parse(start_date, end_date)?;

    let query = state.templates.render_with_column(HEATMAP, intensity).await?;
    let mut table = state.source.execute(&query).await?;
    let fetched = table.row_count();

    if let Some(range) = &range {
        table = filter_date_range(table, DATE_COLUMN, range)?;
    }
    table = apply_filters(table, &filters, state.filter_mode)?;

    let roles = ColumnRoles::new(LONGITUDE_COLUMN, LATITUDE_COLUMN, intensity);
    let collection = project(&table, &roles)?;

    tracing::info!(
        intensity,
        fetched,
        filtered = table.row_count(),
        features = collection.features.len(),
        "heatmap served"
    );
    Ok(Json(collection))
}
