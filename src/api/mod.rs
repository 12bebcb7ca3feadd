//! REST handlers, one module per resource. Every success response carries
//! the executed SQL in `query` so the dashboard can surface the command.

pub mod constraint;
pub mod filter;
pub mod row;
pub mod table;
pub mod view;

use serde::Serialize;
use serde_json::{Map, Value};

/// Success envelope: `{ query, data?, message? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn rows(
        query: String,
        rows: Vec<Map<String, Value>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            query,
            data: Some(Value::Array(rows.into_iter().map(Value::Object).collect())),
            message: Some(message.into()),
        }
    }

    pub fn message(query: String, message: impl Into<String>) -> Self {
        Self {
            query,
            data: None,
            message: Some(message.into()),
        }
    }
}
