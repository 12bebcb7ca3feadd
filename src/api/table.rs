use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::db;
use crate::error::DeckError;
use crate::router::DeckState;
use crate::sql::ddl::{ColumnDef, TableChange, build_alter_table, build_create_table, build_drop_table};
use crate::sql::quote::{Ident, literal_str};

#[derive(Debug, Deserialize)]
pub struct TableParams {
    pub table: Option<String>,
}

fn require_table(params: &TableParams) -> Result<&str, DeckError> {
    params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))
}

/// `GET /api/table?table=all` lists table names; `?table=<t>` lists that
/// table's columns. Both come from information_schema so the metadata shape
/// matches what the dashboard's schema browser consumes.
pub async fn get_table(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;

    if table == "all" {
        let query = "SELECT table_name FROM information_schema.tables \
                     WHERE table_schema = 'public' ORDER BY table_name"
            .to_string();
        let rows = db::fetch_rows(&state.pool, &query).await?;
        return Ok(Json(ApiResponse::rows(
            query,
            rows,
            "Tables retrieved successfully",
        )));
    }

    let table = Ident::new("table", table)?;
    let query = format!(
        "SELECT column_name, data_type FROM information_schema.columns \
         WHERE table_name = {} ORDER BY ordinal_position",
        literal_str(table.as_str())
    );
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Columns retrieved successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct CreateTablePayload {
    pub columns: Vec<ColumnDef>,
}

pub async fn create_table(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
    Json(payload): Json<CreateTablePayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_create_table(table, &payload.columns)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(
        query,
        format!("Table {table} created successfully!"),
    )))
}

#[derive(Debug, Deserialize)]
pub struct AlterTablePayload {
    pub changes: Vec<TableChange>,
}

pub async fn alter_table(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
    Json(payload): Json<AlterTablePayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_alter_table(table, &payload.changes)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(
        query,
        format!("Table {table} updated successfully!"),
    )))
}

pub async fn drop_table(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = require_table(&params)?;
    let query = build_drop_table(table)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(
        query,
        format!("Table {table} dropped successfully!"),
    )))
}
