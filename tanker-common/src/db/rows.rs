//! Row conversion helpers

use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};

use crate::collector::types::Record;

/// Validate a table or column name before splicing it into SQL
pub fn is_valid_name(name: &str) -> bool {
    // Only allow alphanumeric and underscore
    name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !name.is_empty()
        && name.len() < 100
}

/// Convert one SQLite row into a JSON record keyed by column name
pub fn row_to_record(row: &SqliteRow) -> Record {
    let mut record = Record::new();
    for (i, column) in row.columns().iter().enumerate() {
        record.insert(column.name().to_string(), column_value(row, i));
    }
    record
}

/// JSON value of column `i`; NULL and unsupported types (BLOB) become null
pub fn column_value(row: &SqliteRow, i: usize) -> Value {
    row.try_get_raw(i)
        .ok()
        .and_then(|val| {
            if val.is_null() {
                Some(Value::Null)
            } else {
                row.try_get::<i64, _>(i)
                    .ok()
                    .map(|v| json!(v))
                    .or_else(|| row.try_get::<f64, _>(i).ok().map(|v| json!(v)))
                    .or_else(|| row.try_get::<String, _>(i).ok().map(Value::String))
            }
        })
        .unwrap_or(Value::Null)
}
