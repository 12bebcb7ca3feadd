use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::db;
use crate::error::DeckError;
use crate::router::DeckState;
use crate::sql::view::{CreateViewPayload, build_create_view, build_drop_view, build_view_select};

#[derive(Debug, Deserialize)]
pub struct ViewParams {
    pub name: Option<String>,
    pub table: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn require_name(params: &ViewParams) -> Result<&str, DeckError> {
    params
        .name
        .as_deref()
        .ok_or(DeckError::MissingParam("View name"))
}

fn parse_paging(raw: Option<&str>, err: DeckError) -> Result<Option<i64>, DeckError> {
    match raw {
        Some(raw) => raw.parse().map(Some).map_err(|_| err),
        None => Ok(None),
    }
}

/// `GET /api/view?name=<v>[&limit&offset]`
pub async fn get_view(
    State(state): State<DeckState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let name = require_name(&params)?;
    let limit = parse_paging(params.limit.as_deref(), DeckError::InvalidLimit)?;
    let offset = parse_paging(params.offset.as_deref(), DeckError::InvalidOffset)?;

    let query = build_view_select(name, limit, offset)?;
    let rows = db::fetch_rows(&state.pool, &query).await?;
    Ok(Json(ApiResponse::rows(
        query,
        rows,
        "Data retrieved successfully",
    )))
}

/// `POST /api/view?table=<t>` with `{viewName, select, withCheckOption}`
pub async fn create_view(
    State(state): State<DeckState>,
    Query(params): Query<ViewParams>,
    Json(payload): Json<CreateViewPayload>,
) -> Result<Json<ApiResponse>, DeckError> {
    let table = params
        .table
        .as_deref()
        .ok_or(DeckError::MissingParam("Table name"))?;
    let query = build_create_view(table, &payload)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(query, "View created successfully")))
}

/// `DELETE /api/view?name=<v>`
pub async fn drop_view(
    State(state): State<DeckState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<ApiResponse>, DeckError> {
    let name = require_name(&params)?;
    let query = build_drop_view(name)?;
    db::execute(&state.pool, &query).await?;
    Ok(Json(ApiResponse::message(
        query,
        format!("View {name} dropped successfully"),
    )))
}
