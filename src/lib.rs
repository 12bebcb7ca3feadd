pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod router;
pub mod sql;

pub use error::DeckError;
