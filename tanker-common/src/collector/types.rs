//! Shared type definitions for the collector
//!
//! Records are plain JSON objects owned by the caller. Identifiers are the
//! opaque keys pulled out of their reference fields.

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A caller-owned record: field name to heterogeneous value, in insertion order
pub type Record = Map<String, Value>;

/// Deduplicated identifiers handed to a fetch capability
pub type IdSet = BTreeSet<Identifier>;

/// Fetched records keyed by the identifier that produced them
pub type Resolved = HashMap<Identifier, Record>;

/// Opaque reference value extracted from a record field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl Identifier {
    /// Convert a single JSON value into an identifier
    ///
    /// Returns `None` for null, empty strings, booleans, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Identifier::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Identifier::Int(i)),
                // u64 above i64::MAX and floats keep their JSON text
                None => Some(Identifier::Str(n.to_string())),
            },
            _ => None,
        }
    }

    /// JSON form used when writing the identifier back into a record
    pub fn to_value(&self) -> Value {
        match self {
            Identifier::Int(i) => Value::from(*i),
            Identifier::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(i) => write!(f, "{}", i),
            Identifier::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Str(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Str(value)
    }
}
