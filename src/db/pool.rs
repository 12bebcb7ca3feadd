use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

use crate::db::rows::rows_to_json;
use crate::error::DeckError;

pub type DeckPool = PgPool;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Pool that defers the first connection to first use. Lets validation-only
/// paths (and their tests) run without a reachable database.
pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)
}

/// Run a SELECT-shaped statement and decode every row into a JSON object.
pub async fn fetch_rows(pool: &PgPool, query: &str) -> Result<Vec<Map<String, Value>>, DeckError> {
    debug!(%query, "executing");
    let rows = sqlx::query(query).fetch_all(pool).await?;
    Ok(rows_to_json(&rows))
}

/// Run a statement for side effects; returns the affected-row count.
pub async fn execute(pool: &PgPool, query: &str) -> Result<u64, DeckError> {
    debug!(%query, "executing");
    let result = sqlx::query(query).execute(pool).await?;
    Ok(result.rows_affected())
}
