use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Decode a dynamically-shaped result set into JSON objects keyed by column
/// name. The statements this service runs are assembled at request time, so
/// nothing about the row shape is known at compile time; decoding dispatches
/// on the Postgres type name instead.
pub fn rows_to_json(rows: &[PgRow]) -> Vec<Map<String, Value>> {
    rows.iter().map(row_to_json).collect()
}

pub fn row_to_json(row: &PgRow) -> Map<String, Value> {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, index, column.type_info().name());
        object.insert(column.name().to_string(), value);
    }
    object
}

fn get<'r, T>(row: &'r PgRow, index: usize) -> Option<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}

fn number(n: impl Into<f64>) -> Value {
    Number::from_f64(n.into()).map(Value::Number).unwrap_or(Value::Null)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => get::<bool>(row, index).map(Value::Bool).unwrap_or(Value::Null),
        "INT2" => get::<i16>(row, index).map(|v| Value::from(v as i64)).unwrap_or(Value::Null),
        "INT4" => get::<i32>(row, index).map(|v| Value::from(v as i64)).unwrap_or(Value::Null),
        "INT8" => get::<i64>(row, index).map(Value::from).unwrap_or(Value::Null),
        "FLOAT4" => get::<f32>(row, index).map(number).unwrap_or(Value::Null),
        "FLOAT8" => get::<f64>(row, index).map(number).unwrap_or(Value::Null),
        // NUMERIC keeps full precision as a string, the way Postgres' own
        // text protocol reports it.
        "NUMERIC" => get::<Decimal>(row, index)
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => get::<String>(row, index)
            .map(Value::String)
            .unwrap_or(Value::Null),
        "JSON" | "JSONB" => get::<Value>(row, index).unwrap_or(Value::Null),
        "TIMESTAMPTZ" => get::<DateTime<Utc>>(row, index)
            .map(|t| Value::String(t.to_rfc3339()))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => get::<NaiveDateTime>(row, index)
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null),
        "DATE" => get::<NaiveDate>(row, index)
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        "TIME" => get::<NaiveTime>(row, index)
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null),
        // Anything else: best-effort text decode, null when that fails too.
        _ => get::<String>(row, index).map(Value::String).unwrap_or(Value::Null),
    }
}
