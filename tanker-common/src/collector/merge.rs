//! Merge fetched records back into the registered targets
//!
//! For every (target, field, record) the derived key `field + suffix` is
//! written. Original field values are left alone, except that a `null`
//! scalar is rewritten to the canonical empty string.

use serde_json::{Map, Value};

use super::aggregate::Aggregate;
use super::normalize::NormalizedValue;
use super::registry::Target;
use super::types::{Record, Resolved};

/// Derived key for a field under the given suffix
pub fn derived_key(field: &str, suffix: &str) -> String {
    format!("{}{}", field, suffix)
}

/// Value written under the derived key for one normalized field
pub fn merged_value(shape: &NormalizedValue, resolved: &Resolved) -> Value {
    match shape {
        NormalizedValue::Empty => empty_container(),
        NormalizedValue::Scalar(id) => resolved
            .get(id)
            .map(|record| Value::Object(record.clone()))
            .unwrap_or_else(empty_container),
        NormalizedValue::List(ids) => {
            let mut keyed = Map::new();
            for id in ids {
                if let Some(record) = resolved.get(id) {
                    keyed.insert(id.to_string(), Value::Object(record.clone()));
                }
            }
            Value::Object(keyed)
        }
    }
}

/// Write every derived key into the targets' records
pub fn merge(targets: &mut [Target<'_>], aggregate: &Aggregate, resolved: &Resolved, suffix: &str) {
    for (target, shapes) in targets.iter_mut().zip(&aggregate.shapes) {
        let records = target.reference.records_mut();

        for field_shapes in shapes {
            let key = derived_key(&field_shapes.field, suffix);

            for (record, shape) in records.iter_mut().zip(&field_shapes.values) {
                if matches!(shape, NormalizedValue::Empty) {
                    blank_null(record, &field_shapes.field);
                }
                record.insert(key.clone(), merged_value(shape, resolved));
            }
        }
    }
}

fn empty_container() -> Value {
    Value::Object(Map::new())
}

fn blank_null(record: &mut Record, field: &str) {
    if let Some(value) = record.get_mut(field) {
        if value.is_null() {
            *value = Value::String(String::new());
        }
    }
}
