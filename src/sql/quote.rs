use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::DeckError;

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap_or_else(|e| panic!("identifier regex: {e}"))
});

pub fn is_valid_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// A validated SQL identifier (table, column, view, or constraint name).
///
/// Construction rejects anything outside `[A-Za-z_][A-Za-z0-9_]*`, so the
/// `Display` impl can render the double-quoted form without further escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident<'a>(&'a str);

impl<'a> Ident<'a> {
    pub fn new(what: &'static str, name: &'a str) -> Result<Self, DeckError> {
        if is_valid_identifier(name) {
            Ok(Ident(name))
        } else {
            Err(DeckError::invalid_ident(what, name))
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Quote and validate a list of column names, joined with `", "`.
pub fn ident_list(what: &'static str, names: &[String]) -> Result<String, DeckError> {
    let quoted = names
        .iter()
        .map(|n| Ident::new(what, n).map(|i| i.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(", "))
}

/// Render a string as a single-quoted SQL literal, doubling embedded quotes.
pub fn literal_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a JSON value as a SQL literal.
///
/// Strings are single-quoted with `''` doubling, numbers and booleans are
/// bare, null is `NULL`, and arrays become a comma-joined literal list (the
/// caller supplies parentheses for `IN`). Nested objects are serialized to
/// their JSON text and quoted as a string.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => literal_str(s),
        Value::Array(items) => items.iter().map(literal).collect::<Vec<_>>().join(", "),
        Value::Object(_) => literal_str(&value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["users", "_hidden", "Table2", "a"] {
            assert!(is_valid_identifier(name), "{name}");
        }
    }

    #[test]
    fn rejects_hostile_identifiers() {
        for name in ["", "1abc", "users;", "a b", "users--", "\"quoted\"", "päivä"] {
            assert!(!is_valid_identifier(name), "{name}");
        }
    }

    #[test]
    fn ident_renders_double_quoted() {
        let id = Ident::new("table", "users").unwrap();
        assert_eq!(id.to_string(), "\"users\"");
    }

    #[test]
    fn ident_new_reports_what_failed() {
        let err = Ident::new("column", "drop table").unwrap_err();
        assert_eq!(err.to_string(), "Invalid column name: drop table");
    }

    #[test]
    fn literal_escapes_embedded_quotes() {
        assert_eq!(literal(&json!("O'Brien")), "'O''Brien'");
        assert_eq!(literal(&json!("'; DROP TABLE users; --")), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn literal_renders_scalars() {
        assert_eq!(literal(&json!(42)), "42");
        assert_eq!(literal(&json!(2.5)), "2.5");
        assert_eq!(literal(&json!(true)), "TRUE");
        assert_eq!(literal(&json!(null)), "NULL");
    }

    #[test]
    fn literal_renders_arrays_as_lists() {
        assert_eq!(literal(&json!(["a", "b'c", 3])), "'a', 'b''c', 3");
    }
}
