use serde::Deserialize;

use crate::error::DeckError;
use crate::sql::quote::{Ident, ident_list};

/// Constraint payload variants, tagged by `type` in the JSON body.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Constraint {
    #[serde(rename = "PRIMARY_KEY")]
    PrimaryKey { columns: Vec<String> },
    #[serde(rename = "FOREIGN_KEY", rename_all = "camelCase")]
    ForeignKey {
        columns: Vec<String>,
        foreign_table: String,
        foreign_columns: Vec<String>,
    },
    #[serde(rename = "UNIQUE")]
    Unique { column: String },
    #[serde(rename = "NOT_NULL")]
    NotNull { columns: Vec<String> },
    #[serde(rename = "CHECK", rename_all = "camelCase")]
    Check { check_string: String },
}

/// One ALTER TABLE statement per constraint. Constraint names are derived
/// from the table and column names (`<t>_<cols>_PK/FK/UK`, `<t>_CC`), which
/// keeps them inside the identifier whitelist.
pub fn build_constraint(table: &str, constraint: &Constraint) -> Result<String, DeckError> {
    let table_ident = Ident::new("table", table)?;
    match constraint {
        Constraint::PrimaryKey { columns } => {
            if columns.is_empty() {
                return Err(DeckError::InvalidPayload("constraints"));
            }
            let name = format!("{table}_{}_PK", columns.join("_"));
            let name = Ident::new("constraint", &name)?;
            let cols = ident_list("column", columns)?;
            Ok(format!(
                "ALTER TABLE {table_ident} ADD CONSTRAINT {name} PRIMARY KEY ({cols})"
            ))
        }
        Constraint::ForeignKey {
            columns,
            foreign_table,
            foreign_columns,
        } => {
            if columns.is_empty() || foreign_columns.is_empty() {
                return Err(DeckError::InvalidPayload("constraints"));
            }
            let name = format!("{table}_{}_FK", columns.join("_"));
            let name = Ident::new("constraint", &name)?;
            let cols = ident_list("column", columns)?;
            let foreign_table = Ident::new("table", foreign_table)?;
            let foreign_cols = ident_list("column", foreign_columns)?;
            Ok(format!(
                "ALTER TABLE {table_ident} ADD CONSTRAINT {name} FOREIGN KEY ({cols}) REFERENCES {foreign_table} ({foreign_cols})"
            ))
        }
        Constraint::Unique { column } => {
            let name = format!("{table}_{column}_UK");
            let name = Ident::new("constraint", &name)?;
            let column = Ident::new("column", column)?;
            Ok(format!(
                "ALTER TABLE {table_ident} ADD CONSTRAINT {name} UNIQUE({column})"
            ))
        }
        Constraint::NotNull { columns } => {
            if columns.is_empty() {
                return Err(DeckError::InvalidPayload("constraints"));
            }
            let actions = columns
                .iter()
                .map(|col| {
                    let col = Ident::new("column", col)?;
                    Ok(format!("ALTER COLUMN {col} SET NOT NULL"))
                })
                .collect::<Result<Vec<_>, DeckError>>()?;
            Ok(format!("ALTER TABLE {table_ident} {}", actions.join(", ")))
        }
        Constraint::Check { check_string } => {
            // The check expression is the one verbatim slot in the API;
            // callers are trusted operators.
            let name = format!("{table}_CC");
            let name = Ident::new("constraint", &name)?;
            Ok(format!(
                "ALTER TABLE {table_ident} ADD CONSTRAINT {name} CHECK ({check_string})"
            ))
        }
    }
}

pub fn build_constraints(
    table: &str,
    constraints: &[Constraint],
) -> Result<Vec<String>, DeckError> {
    if constraints.is_empty() {
        return Err(DeckError::InvalidPayload("constraints"));
    }
    constraints
        .iter()
        .map(|c| build_constraint(table, c))
        .collect()
}
