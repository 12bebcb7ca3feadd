use serde_json::{Map, Value};

use crate::error::DeckError;
use crate::sql::quote::{Ident, literal};

/// Render an equality condition per map entry, `"col" = <literal>`.
///
/// Map iteration is in sorted key order, so the generated SQL is
/// deterministic for a given payload.
pub fn eq_conditions(entries: &Map<String, Value>) -> Result<Vec<String>, DeckError> {
    entries
        .iter()
        .map(|(key, value)| {
            let column = Ident::new("column", key)?;
            Ok(format!("{column} = {}", literal(value)))
        })
        .collect()
}

/// `INSERT INTO "t" ("a", "b") VALUES (1, 'x')`
pub fn build_insert(table: &str, values: &Map<String, Value>) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    if values.is_empty() {
        return Err(DeckError::InvalidPayload("values"));
    }
    let mut columns = Vec::with_capacity(values.len());
    let mut literals = Vec::with_capacity(values.len());
    for (key, value) in values {
        columns.push(Ident::new("column", key)?.to_string());
        literals.push(literal(value));
    }
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        literals.join(", ")
    ))
}

/// `UPDATE "t" SET "a" = 'x' WHERE "id" = 1 AND ...`
pub fn build_update(
    table: &str,
    identifier: &Map<String, Value>,
    values: &Map<String, Value>,
) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    if identifier.is_empty() || values.is_empty() {
        return Err(DeckError::InvalidPayload("identifier or values"));
    }
    let set_clause = eq_conditions(values)?.join(", ");
    let where_clause = eq_conditions(identifier)?.join(" AND ");
    Ok(format!("UPDATE {table} SET {set_clause} WHERE {where_clause}"))
}

/// `DELETE FROM "t" WHERE "id" = 1 AND ...`
pub fn build_delete(table: &str, identifier: &Map<String, Value>) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    if identifier.is_empty() {
        return Err(DeckError::InvalidPayload("identifier"));
    }
    let where_clause = eq_conditions(identifier)?.join(" AND ");
    Ok(format!("DELETE FROM {table} WHERE {where_clause}"))
}
