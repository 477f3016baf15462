//! Template listings: /get_columns_table, /get_filters

use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use gq_core::ResultTable;
use gq_data::templates::{COLUMNS_TABLE, FILTERS};
use std::sync::Arc;

async fn run_template(state: &AppState, name: &str) -> Result<ResultTable> {
    let query = state.templates.load(name).await?;
    let table = state.source.execute(&query).await?;
    tracing::info!(template = name, rows = table.row_count(), "template served");
    Ok(table)
}

/// GET /get_columns_table
pub async fn get_columns_table(State(state): State<Arc<AppState>>) -> Result<Json<ResultTable>> {
    run_template(&state, COLUMNS_TABLE).await.map(Json)
}

/// GET /get_filters
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Result<Json<ResultTable>> {
    run_template(&state, FILTERS).await.map(Json)
}
