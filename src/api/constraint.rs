use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::api::table::TableParams;
use crate::db;
use crate::error::DeckError;
use crate::router::DeckState;
use crate::sql::constraint::{Constraint, build_constraints};
use crate::sql::quote::{Ident, literal_str};

/// `GET /api/constraint?table=<t>` — constraint metadata with the column and
/// foreign-reference fields resolved, which a bare `table_constraints` row
/// does not carry.
pub async fn get_constraints(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))?;
    let table = Ident::new("table", table)?;

    let query = format!(
        "SELECT tc.constraint_name, tc.constraint_type, kcu.column_name, \
         ccu.table_name AS foreign_table_name, ccu.column_name AS foreign_column_name \
         FROM information_schema.table_constraints tc \
         LEFT JOIN information_schema.key_column_usage kcu \
         ON tc.constraint_name = kcu.constraint_name \
         LEFT JOIN information_schema.constraint_column_usage ccu \
         ON tc.constraint_name = ccu.constraint_name \
         WHERE tc.table_name = {}",
        literal_str(table.as_str())
    );
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Constraints retrieved successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct ConstraintPayload {
    pub constraints: Vec<Constraint>,
}

/// `POST /api/constraint?table=<t>` — one ALTER TABLE per constraint,
/// executed in payload order. No transaction: the first driver failure
/// aborts and any statements already applied stay applied.
pub async fn add_constraints(
    State(state): State<DeckState>,
    Query(params): Query<TableParams>,
    Json(payload): Json<ConstraintPayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))?;

    let statements = build_constraints(table, &payload.constraints)?;
    for statement in &statements {
        db::execute(&state.pool, statement).await?;
    }
    Ok(Json(ApiResponse::message(
        statements.join("; "),
        "Constraint added successfully",
    )))
}
