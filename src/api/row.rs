use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::ApiResponse;
use crate::db;
use crate::error::DeckError;
use crate::router::DeckState;
use crate::sql::dml::{build_delete, build_insert, build_update};
use crate::sql::quote::Ident;

#[derive(Debug, Deserialize)]
pub struct RowParams {
    pub table: Option<String>,
    pub count: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn require_table(params: &RowParams) -> Result<&str, DeckError> {
    params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))
}

/// `GET /api/row?table=<t>[&count][&limit&offset]` — row count or a page of
/// rows (defaults: limit 10, offset 0).
pub async fn get_rows(
    State(state): State<DeckState>,
    Query(params): Query<RowParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = Ident::new("table", require_table(&params)?)?;

    if params.count.is_some() {
        let query = format!("SELECT COUNT(*) FROM {table}");
        let rows = db::fetch_rows(&state.pool, &query).await?;
        return Ok(Json(ApiResponse::rows(
            query,
            rows,
            "Count retrieved successfully!",
        )));
    }

    let limit: i64 = match params.limit.as_deref() {
        Some(raw) => raw.parse().map_err(|_| DeckError::InvalidLimit)?,
        None => 10,
    };
    if limit <= 0 {
        return Err(DeckError::InvalidLimit);
    }
    let offset: i64 = match params.offset.as_deref() {
        Some(raw) => raw.parse().map_err(|_| DeckError::InvalidOffset)?,
        None => 0,
    };
    if offset < 0 {
        return Err(DeckError::InvalidOffset);
    }

    let query = format!("SELECT * FROM {table} LIMIT {limit} OFFSET {offset}");
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Rows retrieved successfully!",
    )))
}

#[derive(Debug, Deserialize)]
pub struct InsertRowPayload {
    pub values: Map<String, Value>,
}

pub async fn insert_row(
    State(state): State<DeckState>,
    Query(params): Query<RowParams>,
    Json(payload): Json<InsertRowPayload>,
) -> Result<(StatusCode, Json<ApiResponse>), DeckError> {
    let table = require_table(&params)?;
    let query = build_insert(table, &payload.values)?;
    db::execute(&state.pool, &query).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(query, "Row inserted successfully!")),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRowPayload {
    pub identifier: Map<String, Value>,
    pub values: Map<String, Value>,
}

pub async fn update_row(
    State(state): State<DeckState>,
    Query(params): Query<RowParams>,
    Json(payload): Json<UpdateRowPayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_update(table, &payload.identifier, &payload.values)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(query, "Row updated successfully!")))
}

/// The DELETE body is the identifier map itself.
pub async fn delete_row(
    State(state): State<DeckState>,
    Query(params): Query<RowParams>,
    Json(identifier): Json<Map<String, Value>>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_delete(table, &identifier)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(query, "Row deleted successfully!")))
}
