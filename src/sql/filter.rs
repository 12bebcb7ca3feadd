use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DeckError;
use crate::sql::quote::{Ident, literal};

/// Filter operators, tagged by `type` in the JSON body.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Filter {
    #[serde(rename = "=")]
    Eq { column: String, value: Value },
    #[serde(rename = "!=")]
    Ne { column: String, value: Value },
    #[serde(rename = "<")]
    Lt { column: String, value: Value },
    #[serde(rename = "<=")]
    Le { column: String, value: Value },
    #[serde(rename = ">")]
    Gt { column: String, value: Value },
    #[serde(rename = ">=")]
    Ge { column: String, value: Value },
    #[serde(rename = "IN")]
    In { column: String, value: Value },
    #[serde(rename = "NOT IN")]
    NotIn { column: String, value: Value },
    #[serde(rename = "BETWEEN")]
    Between { column: String, value: Value },
    #[serde(rename = "IS NULL")]
    IsNull { column: String },
    #[serde(rename = "IS NOT NULL")]
    IsNotNull { column: String },
    #[serde(rename = "ILIKE")]
    Ilike { column: String, value: Value },
}

impl Filter {
    fn render(&self) -> Result<String, DeckError> {
        match self {
            Filter::Eq { column, value } => comparison(column, "=", value),
            Filter::Ne { column, value } => comparison(column, "!=", value),
            Filter::Lt { column, value } => comparison(column, "<", value),
            Filter::Le { column, value } => comparison(column, "<=", value),
            Filter::Gt { column, value } => comparison(column, ">", value),
            Filter::Ge { column, value } => comparison(column, ">=", value),
            Filter::In { column, value } => membership(column, "IN", value),
            Filter::NotIn { column, value } => membership(column, "NOT IN", value),
            Filter::Between { column, value } => {
                let column = Ident::new("column", column)?;
                let bounds = value
                    .as_array()
                    .filter(|b| b.len() == 2)
                    .ok_or(DeckError::InvalidPayload("filters"))?;
                Ok(format!(
                    "{column} BETWEEN {} AND {}",
                    literal(&bounds[0]),
                    literal(&bounds[1])
                ))
            }
            Filter::IsNull { column } => {
                let column = Ident::new("column", column)?;
                Ok(format!("{column} IS NULL"))
            }
            Filter::IsNotNull { column } => {
                let column = Ident::new("column", column)?;
                Ok(format!("{column} IS NOT NULL"))
            }
            Filter::Ilike { column, value } => comparison(column, "ILIKE", value),
        }
    }
}

fn comparison(column: &str, op: &str, value: &Value) -> Result<String, DeckError> {
    let column = Ident::new("column", column)?;
    Ok(format!("{column} {op} {}", literal(value)))
}

fn membership(column: &str, op: &str, value: &Value) -> Result<String, DeckError> {
    let column = Ident::new("column", column)?;
    Ok(format!("{column} {op} ({})", literal(value)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Direction {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

const AGGREGATE_FUNCS: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX"];
const HAVING_OPERATORS: &[&str] = &["=", "!=", "<", "<=", ">", ">="];

#[derive(Debug, Clone, Deserialize)]
pub struct Aggregate {
    pub func: String,
    pub column: String,
}

impl Aggregate {
    /// `SUM("amount") AS "SUM_amount"`
    fn render(&self) -> Result<String, DeckError> {
        let func = check_aggregate(&self.func)?;
        let column = Ident::new("column", &self.column)?;
        // The alias stays inside the whitelist because the function name and
        // the validated column are its only parts.
        Ok(format!("{func}({column}) AS \"{func}_{}\"", self.column))
    }
}

fn check_aggregate(func: &str) -> Result<&'static str, DeckError> {
    AGGREGATE_FUNCS
        .iter()
        .find(|f| f.eq_ignore_ascii_case(func))
        .copied()
        .ok_or_else(|| DeckError::InvalidAggregate(func.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Having {
    pub func: String,
    pub column: String,
    pub operator: String,
    pub value: Value,
}

impl Having {
    /// `HAVING SUM("amount") > 100`
    fn render(&self) -> Result<String, DeckError> {
        let func = check_aggregate(&self.func)?;
        let column = Ident::new("column", &self.column)?;
        let op = HAVING_OPERATORS
            .iter()
            .find(|o| **o == self.operator)
            .ok_or_else(|| DeckError::InvalidOperator(self.operator.clone()))?;
        Ok(format!("HAVING {func}({column}) {op} {}", literal(&self.value)))
    }
}

/// The full SELECT description a filter or view-creation request carries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSpec {
    #[serde(default)]
    pub columns: Vec<String>,
    pub filters: Option<Vec<Filter>>,
    pub group_by: Option<Vec<String>>,
    pub aggregates: Option<Vec<Aggregate>>,
    pub having: Option<Having>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn where_clause(filters: Option<&[Filter]>) -> Result<Option<String>, DeckError> {
    let Some(filters) = filters.filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let conditions = filters
        .iter()
        .map(Filter::render)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(format!("WHERE {}", conditions.join(" AND "))))
}

/// Assemble the full SELECT for a table and spec. Clauses are joined with
/// single spaces and absent clauses leave no residue, so the returned text
/// is stable for a given payload.
pub fn build_select(table: &str, spec: &SelectSpec) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;

    let mut select_items = spec
        .columns
        .iter()
        .map(|col| Ident::new("column", col).map(|i| i.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(aggregates) = spec.aggregates.as_deref() {
        for agg in aggregates {
            select_items.push(agg.render()?);
        }
    }
    let select_clause = if select_items.is_empty() {
        "*".to_string()
    } else {
        select_items.join(", ")
    };

    let mut parts = vec![format!("SELECT {select_clause} FROM {table}")];
    if let Some(clause) = where_clause(spec.filters.as_deref())? {
        parts.push(clause);
    }
    if let Some(group_by) = spec.group_by.as_deref().filter(|g| !g.is_empty()) {
        let cols = group_by
            .iter()
            .map(|col| Ident::new("column", col).map(|i| i.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        parts.push(format!("GROUP BY {}", cols.join(", ")));
    }
    if let Some(having) = &spec.having {
        parts.push(having.render()?);
    }
    if let Some(order_by) = &spec.order_by {
        let column = Ident::new("column", &order_by.column)?;
        parts.push(format!("ORDER BY {column} {}", order_by.direction));
    }
    if let Some(limit) = spec.limit {
        if limit <= 0 {
            return Err(DeckError::InvalidLimit);
        }
        parts.push(format!("LIMIT {limit}"));
    }
    if let Some(offset) = spec.offset {
        if offset < 0 {
            return Err(DeckError::InvalidOffset);
        }
        parts.push(format!("OFFSET {offset}"));
    }
    Ok(parts.join(" "))
}

/// `SELECT COUNT(*) FROM "t" [WHERE ...]` — the `count` variant of a filter
/// request reuses the WHERE clause and drops everything else.
pub fn build_count(table: &str, filters: Option<&[Filter]>) -> Result<String, DeckError> {
    let table = Ident::new("table", table)?;
    let mut query = format!("SELECT COUNT(*) FROM {table}");
    if let Some(clause) = where_clause(filters)? {
        query.push(' ');
        query.push_str(&clause);
    }
    Ok(query)
}

/// The simple per-table browse query: equality filters from a key/value map,
/// optional sort, LIMIT/OFFSET.
pub fn build_table_filter(
    table: &str,
    filters: &Map<String, Value>,
    sort: Option<&OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<String, DeckError> {
    let table_ident = Ident::new("table", table)?;
    let mut parts = vec![format!("SELECT * FROM {table_ident}")];
    if !filters.is_empty() {
        let conditions = crate::sql::dml::eq_conditions(filters)?;
        parts.push(format!("WHERE {}", conditions.join(" AND ")));
    }
    if let Some(sort) = sort {
        let column = Ident::new("column", &sort.column)?;
        parts.push(format!("ORDER BY {column} {}", sort.direction));
    }
    if let Some(limit) = limit {
        if limit <= 0 {
            return Err(DeckError::InvalidLimit);
        }
        parts.push(format!("LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        if offset < 0 {
            return Err(DeckError::InvalidOffset);
        }
        parts.push(format!("OFFSET {offset}"));
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> SelectSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn bare_spec_selects_star() {
        let query = build_select("users", &SelectSpec::default()).unwrap();
        assert_eq!(query, "SELECT * FROM \"users\"");
    }

    #[test]
    fn full_spec_matches_template() {
        let s = spec(json!({
            "columns": ["org"],
            "filters": [
                {"type": ">=", "column": "age", "value": 18},
                {"type": "ILIKE", "column": "name", "value": "a%"}
            ],
            "groupBy": ["org"],
            "aggregates": [{"func": "count", "column": "id"}],
            "having": {"func": "COUNT", "column": "id", "operator": ">", "value": 5},
            "orderBy": {"column": "org", "direction": "ASC"},
            "limit": 10,
            "offset": 20
        }));
        let query = build_select("users", &s).unwrap();
        assert_eq!(
            query,
            "SELECT \"org\", COUNT(\"id\") AS \"COUNT_id\" FROM \"users\" \
             WHERE \"age\" >= 18 AND \"name\" ILIKE 'a%' \
             GROUP BY \"org\" HAVING COUNT(\"id\") > 5 ORDER BY \"org\" ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn operator_filters_render() {
        let cases = [
            (json!({"type": "=", "column": "a", "value": 1}), "\"a\" = 1"),
            (json!({"type": "!=", "column": "a", "value": 1}), "\"a\" != 1"),
            (json!({"type": "<", "column": "a", "value": 1}), "\"a\" < 1"),
            (json!({"type": "<=", "column": "a", "value": 1}), "\"a\" <= 1"),
            (json!({"type": ">", "column": "a", "value": 1}), "\"a\" > 1"),
            (json!({"type": ">=", "column": "a", "value": 1}), "\"a\" >= 1"),
            (
                json!({"type": "IN", "column": "a", "value": ["x", "y"]}),
                "\"a\" IN ('x', 'y')",
            ),
            (
                json!({"type": "NOT IN", "column": "a", "value": [1, 2]}),
                "\"a\" NOT IN (1, 2)",
            ),
            (
                json!({"type": "BETWEEN", "column": "a", "value": [1, 9]}),
                "\"a\" BETWEEN 1 AND 9",
            ),
            (json!({"type": "IS NULL", "column": "a"}), "\"a\" IS NULL"),
            (
                json!({"type": "IS NOT NULL", "column": "a"}),
                "\"a\" IS NOT NULL",
            ),
            (
                json!({"type": "ILIKE", "column": "a", "value": "%x%"}),
                "\"a\" ILIKE '%x%'",
            ),
        ];
        for (input, expected) in cases {
            let filter: Filter = serde_json::from_value(input).unwrap();
            assert_eq!(filter.render().unwrap(), expected);
        }
    }

    #[test]
    fn between_requires_two_bounds() {
        let filter: Filter =
            serde_json::from_value(json!({"type": "BETWEEN", "column": "a", "value": [1]}))
                .unwrap();
        assert_eq!(
            filter.render().unwrap_err().to_string(),
            "Invalid filters structure"
        );
    }

    #[test]
    fn unknown_aggregate_is_rejected() {
        let s = spec(json!({
            "columns": [],
            "aggregates": [{"func": "PG_SLEEP", "column": "id"}]
        }));
        let err = build_select("users", &s).unwrap_err();
        assert_eq!(err.to_string(), "Invalid aggregate function: PG_SLEEP");
    }

    #[test]
    fn unknown_having_operator_is_rejected() {
        let s = spec(json!({
            "columns": ["a"],
            "having": {"func": "SUM", "column": "a", "operator": "; --", "value": 1}
        }));
        let err = build_select("users", &s).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operator: ; --");
    }

    #[test]
    fn count_variant_keeps_only_the_where_clause() {
        let filters: Vec<Filter> = serde_json::from_value(json!([
            {"type": "=", "column": "org", "value": "acme"}
        ]))
        .unwrap();
        let query = build_count("users", Some(&filters)).unwrap();
        assert_eq!(
            query,
            "SELECT COUNT(*) FROM \"users\" WHERE \"org\" = 'acme'"
        );
        assert_eq!(
            build_count("users", None).unwrap(),
            "SELECT COUNT(*) FROM \"users\""
        );
    }

    #[test]
    fn table_filter_matches_template() {
        let filters = match json!({"org": "acme", "active": true}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let sort = OrderBy {
            column: "name".to_string(),
            direction: Direction::Desc,
        };
        let query =
            build_table_filter("users", &filters, Some(&sort), Some(25), Some(50)).unwrap();
        assert_eq!(
            query,
            "SELECT * FROM \"users\" WHERE \"active\" = TRUE AND \"org\" = 'acme' \
             ORDER BY \"name\" DESC LIMIT 25 OFFSET 50"
        );
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        let s = spec(json!({"columns": [], "limit": 0}));
        assert_eq!(
            build_select("users", &s).unwrap_err().to_string(),
            "Invalid limit value"
        );
        let s = spec(json!({"columns": [], "offset": -1}));
        assert_eq!(
            build_select("users", &s).unwrap_err().to_string(),
            "Invalid offset value"
        );
    }

    #[test]
    fn lowercase_direction_is_accepted() {
        let order: OrderBy =
            serde_json::from_value(json!({"column": "a", "direction": "desc"})).unwrap();
        assert_eq!(order.direction, Direction::Desc);
    }
}
