//! Test helper modules for tanker-common integration tests
//!
//! Provides a stub fetch capability that answers `{id, foo: "bar"}` for every
//! identifier it knows, honors projections, and records each call.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tanker_common::{Error, Fetcher, IdSet, Identifier, Record, Resolved, Result};

/// One recorded invocation of the stub
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
    pub ids: IdSet,
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct FooFetcher {
    /// When set, only these identifiers resolve
    known: Option<BTreeSet<Identifier>>,
    fail: bool,
    calls: Mutex<Vec<FetchCall>>,
}

impl FooFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub that resolves only the listed integer identifiers
    pub fn knowing(ids: &[i64]) -> Self {
        Self {
            known: Some(ids.iter().map(|&id| Identifier::Int(id)).collect()),
            ..Self::default()
        }
    }

    /// Stub whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for FooFetcher {
    async fn fetch(&self, ids: &IdSet, columns: Option<&[String]>) -> Result<Resolved> {
        self.calls.lock().unwrap().push(FetchCall {
            ids: ids.clone(),
            columns: columns.map(|c| c.to_vec()),
        });

        if self.fail {
            return Err(Error::fetch("foo backend unavailable"));
        }

        Ok(ids
            .iter()
            .filter(|id| self.known.as_ref().map_or(true, |known| known.contains(*id)))
            .map(|id| {
                let full = record(json!({"id": id.to_value(), "foo": "bar"}));
                let projected = match columns {
                    Some(cols) => full
                        .into_iter()
                        .filter(|(key, _)| cols.contains(key))
                        .collect(),
                    None => full,
                };
                (id.clone(), projected)
            })
            .collect())
    }
}

/// Build a record from a JSON object literal
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Build a collection from a JSON array of object literals
pub fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items.into_iter().map(record).collect(),
        other => panic!("expected a JSON array, got {}", other),
    }
}

/// Identifier set from integer literals
pub fn int_ids(ids: &[i64]) -> IdSet {
    ids.iter().map(|&id| Identifier::Int(id)).collect()
}
