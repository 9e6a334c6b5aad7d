//! Field value normalization
//!
//! Turns whatever a record holds in a reference field into one of three
//! canonical shapes. The record itself is never touched here; list elements
//! that are null or empty are only dropped from the working copy.

use serde_json::Value;

use super::types::Identifier;

/// Canonical shape of a reference field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    /// Null, empty string, missing field, or a value that cannot be an identifier
    Empty,
    /// A single non-empty identifier
    Scalar(Identifier),
    /// Multi-valued field, empties filtered out (may be empty)
    List(Vec<Identifier>),
}

impl NormalizedValue {
    /// Identifiers this shape contributes to the fetch set
    pub fn ids(&self) -> &[Identifier] {
        match self {
            NormalizedValue::Empty => &[],
            NormalizedValue::Scalar(id) => std::slice::from_ref(id),
            NormalizedValue::List(ids) => ids,
        }
    }
}

/// Normalize a field value (`None` when the record has no such field)
pub fn normalize(value: Option<&Value>) -> NormalizedValue {
    match value {
        Some(Value::Array(items)) => {
            NormalizedValue::List(items.iter().filter_map(Identifier::from_value).collect())
        }
        Some(other) => match Identifier::from_value(other) {
            Some(id) => NormalizedValue::Scalar(id),
            None => NormalizedValue::Empty,
        },
        None => NormalizedValue::Empty,
    }
}
