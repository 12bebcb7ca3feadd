use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DeckError {
    #[error("{0} is required")]
    MissingParam(&'static str),

    #[error("Invalid {what} name: {name}")]
    InvalidIdentifier { what: &'static str, name: String },

    #[error("Invalid column type: {0}")]
    InvalidColumnType(String),

    #[error("Invalid {0} structure")]
    InvalidPayload(&'static str),

    #[error("Invalid limit value")]
    InvalidLimit,

    #[error("Invalid offset value")]
    InvalidOffset,

    #[error("Invalid aggregate function: {0}")]
    InvalidAggregate(String),

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),
}

impl DeckError {
    pub fn invalid_ident(what: &'static str, name: impl Into<String>) -> Self {
        DeckError::InvalidIdentifier {
            what,
            name: name.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DeckError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error envelope: `{ "error": <message> }`.
///
/// Database failures pass the driver message through unchanged; everything
/// else is an input-validation failure reported as 400.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

impl IntoResponse for DeckError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ApiErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
