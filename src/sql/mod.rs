//! Dynamic SQL assembly: every statement the API executes is built here.
//!
//! Layout:
//! - `quote.rs`: identifier validation/quoting and literal rendering
//! - `ddl.rs`: CREATE/ALTER/DROP TABLE
//! - `dml.rs`: row INSERT/UPDATE/DELETE and equality WHERE clauses
//! - `constraint.rs`: ALTER TABLE .. ADD CONSTRAINT variants
//! - `filter.rs`: SELECT builder (filters, grouping, aggregates, paging)
//! - `view.rs`: CREATE OR REPLACE VIEW / DROP VIEW

pub mod constraint;
pub mod ddl;
pub mod dml;
pub mod filter;
pub mod quote;
pub mod view;

pub use constraint::Constraint;
pub use filter::{Filter, SelectSpec};
pub use quote::{Ident, is_valid_identifier, literal};
