//! Database access: pool construction and dynamic result decoding.
//!
//! Layout:
//! - `pool.rs`: PgPool setup plus the query execution helpers
//! - `rows.rs`: decoding dynamically-shaped rows into JSON objects

pub mod pool;
pub mod rows;

pub use pool::{DeckPool, connect, connect_lazy, execute, fetch_rows};
pub use rows::rows_to_json;
