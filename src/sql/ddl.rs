use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::DeckError;
use crate::sql::quote::Ident;

/// Declared column types accepted in CREATE/ALTER TABLE payloads.
static COLUMN_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(INT|VARCHAR\(\d+\)|TEXT|BOOLEAN|DATETIME|FLOAT|DOUBLE|DECIMAL\(\d+,\d+\))$")
        .unwrap_or_else(|e| panic!("column type regex: {e}"))
});

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChangeAction {
    #[serde(rename = "ADD")]
    Add,
    #[serde(rename = "DROP")]
    Drop,
    #[serde(rename = "MODIFY")]
    Modify,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableChange {
    pub action: ChangeAction,
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: Option<String>,
}

fn check_column_type(ty: &str) -> Result<&str, DeckError> {
    if COLUMN_TYPE_RE.is_match(ty) {
        Ok(ty)
    } else {
        Err(DeckError::InvalidColumnType(ty.to_string()))
    }
}

/// `CREATE TABLE "t" ("a" INT, "b" VARCHAR(255))`
pub fn build_create_table(table: &str, columns: &[ColumnDef]) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    if columns.is_empty() {
        return Err(DeckError::InvalidPayload("columns"));
    }
    let defs = columns
        .iter()
        .map(|col| {
            let name = Ident::new("column", &col.name)?;
            let ty = check_column_type(&col.column_type)?;
            Ok(format!("{name} {ty}"))
        })
        .collect::<Result<Vec<_>, DeckError>>()?;
    Ok(format!("CREATE TABLE {table} ({})", defs.join(", ")))
}

/// One ALTER TABLE statement carrying every requested change:
/// `ALTER TABLE "t" ADD COLUMN "a" INT, DROP COLUMN "b", ALTER COLUMN "c" TYPE TEXT`
pub fn build_alter_table(table: &str, changes: &[TableChange]) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    if changes.is_empty() {
        return Err(DeckError::InvalidPayload("changes"));
    }
    let actions = changes
        .iter()
        .map(|change| {
            let column = Ident::new("column", &change.column)?;
            match change.action {
                ChangeAction::Add => {
                    let ty = change
                        .column_type
                        .as_deref()
                        .ok_or(DeckError::InvalidPayload("changes"))?;
                    Ok(format!("ADD COLUMN {column} {}", check_column_type(ty)?))
                }
                ChangeAction::Drop => Ok(format!("DROP COLUMN {column}")),
                ChangeAction::Modify => {
                    let ty = change
                        .column_type
                        .as_deref()
                        .ok_or(DeckError::InvalidPayload("changes"))?;
                    Ok(format!("ALTER COLUMN {column} TYPE {}", check_column_type(ty)?))
                }
            }
        })
        .collect::<Result<Vec<_>, DeckError>>()?;
    Ok(format!("ALTER TABLE {table} {}", actions.join(", ")))
}

/// `DROP TABLE "t"`
pub fn build_drop_table(table: &str) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    Ok(format!("DROP TABLE {table}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, ty: &str) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            column_type: ty.to_string(),
        }
    }

    #[test]
    fn create_table_matches_template() {
        let query = build_create_table(
            "users",
            &[col("id", "INT"), col("name", "VARCHAR(255)"), col("active", "boolean")],
        )
        .unwrap();
        assert_eq!(
            query,
            "CREATE TABLE \"users\" (\"id\" INT, \"name\" VARCHAR(255), \"active\" boolean)"
        );
    }

    #[test]
    fn create_table_rejects_bad_table_name() {
        let err = build_create_table("users; drop", &[col("id", "INT")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid table name: users; drop");
    }

    #[test]
    fn create_table_rejects_unknown_type() {
        let err = build_create_table("users", &[col("id", "SERIAL; --")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid column type: SERIAL; --");
    }

    #[test]
    fn create_table_rejects_empty_columns() {
        let err = build_create_table("users", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid columns structure");
    }

    #[test]
    fn decimal_and_varchar_take_parameters() {
        let query =
            build_create_table("prices", &[col("amount", "DECIMAL(10,2)")]).unwrap();
        assert_eq!(query, "CREATE TABLE \"prices\" (\"amount\" DECIMAL(10,2))");
        // Unparameterized forms are not in the whitelist.
        assert!(build_create_table("p", &[col("a", "DECIMAL")]).is_err());
        assert!(build_create_table("p", &[col("a", "VARCHAR")]).is_err());
    }

    #[test]
    fn alter_table_combines_actions() {
        let changes = vec![
            TableChange {
                action: ChangeAction::Add,
                column: "age".to_string(),
                column_type: Some("INT".to_string()),
            },
            TableChange {
                action: ChangeAction::Drop,
                column: "legacy".to_string(),
                column_type: None,
            },
            TableChange {
                action: ChangeAction::Modify,
                column: "name".to_string(),
                column_type: Some("TEXT".to_string()),
            },
        ];
        let query = build_alter_table("users", &changes).unwrap();
        assert_eq!(
            query,
            "ALTER TABLE \"users\" ADD COLUMN \"age\" INT, DROP COLUMN \"legacy\", ALTER COLUMN \"name\" TYPE TEXT"
        );
    }

    #[test]
    fn alter_table_add_requires_type() {
        let changes = vec![TableChange {
            action: ChangeAction::Add,
            column: "age".to_string(),
            column_type: None,
        }];
        let err = build_alter_table("users", &changes).unwrap_err();
        assert_eq!(err.to_string(), "Invalid changes structure");
    }

    #[test]
    fn drop_table_matches_template() {
        assert_eq!(build_drop_table("users").unwrap(), "DROP TABLE \"users\"");
    }
}
