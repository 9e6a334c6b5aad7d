//! Identifier aggregation
//!
//! Walks every registered target, normalizes each referenced field on each
//! record and folds the identifiers into one deduplicated set. The per-record
//! shapes are kept so the merge phase does not have to normalize again.

use super::normalize::{normalize, NormalizedValue};
use super::registry::Target;
use super::types::IdSet;

/// Normalized values of one field across the records of a target
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShapes {
    pub field: String,
    /// One entry per record, in record order
    pub values: Vec<NormalizedValue>,
}

/// Result of walking the registry
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Every distinct identifier referenced by any field of any record
    pub ids: IdSet,
    /// `shapes[target_index]` lists the fields of that target in registration order
    pub shapes: Vec<Vec<FieldShapes>>,
}

impl Aggregate {
    /// Shape recorded for `(target, field, record)`; single items use record index 0
    pub fn shape(&self, target: usize, field: &str, record: usize) -> Option<&NormalizedValue> {
        self.shapes
            .get(target)?
            .iter()
            .find(|f| f.field == field)?
            .values
            .get(record)
    }
}

/// Collect identifiers and shapes for all targets
pub fn aggregate(targets: &[Target<'_>]) -> Aggregate {
    let mut ids = IdSet::new();
    let mut shapes = Vec::with_capacity(targets.len());

    for target in targets {
        let records = target.reference.records();
        let fields = target.fields.as_deref().unwrap_or_default();

        let mut target_shapes = Vec::with_capacity(fields.len());
        for field in fields {
            let values: Vec<NormalizedValue> = records
                .iter()
                .map(|record| normalize(record.get(field)))
                .collect();

            for value in &values {
                ids.extend(value.ids().iter().cloned());
            }

            target_shapes.push(FieldShapes {
                field: field.clone(),
                values,
            });
        }
        shapes.push(target_shapes);
    }

    Aggregate { ids, shapes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::registry::TargetRegistry;
    use crate::collector::types::{Identifier, Record};
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_ids_shared_across_targets_and_fields() {
        let mut item = records(json!([{"file": 2, "cover": 1}])).remove(0);
        let mut collection = records(json!([
            {"file2": 1},
            {"file2": [2, 3, ""]},
        ]));

        let mut registry = TargetRegistry::new();
        registry.push_item(&mut item);
        registry.attach_fields(["file", "cover"]).unwrap();
        registry.push_collection(&mut collection);
        registry.attach_fields(["file2"]).unwrap();
        let targets = registry.drain();

        let aggregate = aggregate(&targets);
        let ids: Vec<_> = aggregate.ids.iter().cloned().collect();
        assert_eq!(
            ids,
            vec![Identifier::Int(1), Identifier::Int(2), Identifier::Int(3)]
        );

        assert_eq!(
            aggregate.shape(0, "file", 0),
            Some(&NormalizedValue::Scalar(Identifier::Int(2)))
        );
        assert_eq!(
            aggregate.shape(1, "file2", 1),
            Some(&NormalizedValue::List(vec![Identifier::Int(2), Identifier::Int(3)]))
        );
        assert_eq!(aggregate.shape(1, "missing", 0), None);
    }

    #[test]
    fn test_all_empty_fields_produce_no_ids() {
        let mut collection = records(json!([
            {"file": ""},
            {"file": []},
            {"file": null},
            {},
        ]));

        let mut registry = TargetRegistry::new();
        registry.push_collection(&mut collection);
        registry.attach_fields(["file"]).unwrap();
        let targets = registry.drain();

        let aggregate = aggregate(&targets);
        assert!(aggregate.ids.is_empty());
        assert_eq!(aggregate.shapes[0][0].values.len(), 4);
        assert_eq!(aggregate.shape(0, "file", 1), Some(&NormalizedValue::List(vec![])));
        assert_eq!(aggregate.shape(0, "file", 3), Some(&NormalizedValue::Empty));
    }

    #[test]
    fn test_pending_target_contributes_nothing() {
        let mut item = records(json!([{"file": 9}])).remove(0);
        let mut registry = TargetRegistry::new();
        registry.push_item(&mut item);
        let targets = registry.drain();

        let aggregate = aggregate(&targets);
        assert!(aggregate.ids.is_empty());
        assert!(aggregate.shapes[0].is_empty());
    }
}
