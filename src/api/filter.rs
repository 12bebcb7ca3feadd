use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::ApiResponse;
use crate::db;
use crate::error::DeckError;
use crate::router::DeckState;
use crate::sql::filter::{OrderBy, SelectSpec, build_count, build_select, build_table_filter};

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub table: Option<String>,
    pub count: Option<String>,
}

fn require_table(params: &FilterParams) -> Result<&str, DeckError> {
    params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))
}

/// `POST /api/filter?table=<t>[&count]` — the full SELECT builder; with
/// `count`, only the WHERE clause survives into a COUNT(*).
pub async fn filter_rows(
    State(state): State<DeckState>,
    Query(params): Query<FilterParams>,
    Json(spec): Json<SelectSpec>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;

    if params.count.is_some() {
        let query = build_count(table, spec.filters.as_deref())?;
        let rows = db::fetch_rows(&state.pool, &query).await?;
        return Ok(Json(ApiResponse::rows(
            query,
            rows,
            "Count retrieved successfully!",
        )));
    }

    let query = build_select(table, &spec)?;
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Data retrieved successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct TableFilterPayload {
    #[serde(default)]
    pub filters: Map<String, Value>,
    pub sort: Option<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `POST /api/table/filter?table=<t>` — the schema browser's simple variant:
/// equality filters from a key/value map plus optional sort and paging.
pub async fn filter_table(
    State(state): State<DeckState>,
    Query(params): Query<FilterParams>,
    Json(payload): Json<TableFilterPayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_table_filter(
        table,
        &payload.filters,
        payload.sort.as_ref(),
        payload.limit,
        payload.offset,
    )?;
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Data retrieved successfully",
    )))
}
