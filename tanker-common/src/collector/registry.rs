//! Target registry
//!
//! Holds the (record reference, field list) pairs accumulated for one batch.
//! `item` / `collection` open a pending target, `fields` completes the most
//! recently opened target that has no field list yet.

use crate::{Error, Result};

use super::types::Record;

/// Which kind of reference a target was registered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Item,
    Collection,
}

/// Borrowed, caller-owned records a target points at
#[derive(Debug)]
pub enum TargetRef<'r> {
    Item(&'r mut Record),
    Collection(&'r mut [Record]),
}

impl TargetRef<'_> {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            TargetRef::Item(_) => ReferenceKind::Item,
            TargetRef::Collection(_) => ReferenceKind::Collection,
        }
    }

    /// View the reference as a slice; a single item is a slice of one
    pub fn records(&self) -> &[Record] {
        match self {
            TargetRef::Item(record) => std::slice::from_ref(&**record),
            TargetRef::Collection(records) => records,
        }
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        match self {
            TargetRef::Item(record) => std::slice::from_mut(&mut **record),
            TargetRef::Collection(records) => records,
        }
    }
}

/// A registered reference plus the fields to resolve on it
#[derive(Debug)]
pub struct Target<'r> {
    pub reference: TargetRef<'r>,
    /// `None` until `fields(...)` completes the target
    pub fields: Option<Vec<String>>,
}

impl Target<'_> {
    pub fn is_pending(&self) -> bool {
        self.fields.is_none()
    }
}

/// Ordered list of targets registered since the last flush
#[derive(Debug, Default)]
pub struct TargetRegistry<'r> {
    targets: Vec<Target<'r>>,
}

impl<'r> TargetRegistry<'r> {
    pub fn new() -> Self {
        Self { targets: Vec::new() }
    }

    /// Open a pending target bound to a single record
    pub fn push_item(&mut self, record: &'r mut Record) {
        self.targets.push(Target {
            reference: TargetRef::Item(record),
            fields: None,
        });
    }

    /// Open a pending target bound to an ordered collection of records
    pub fn push_collection(&mut self, records: &'r mut [Record]) {
        self.targets.push(Target {
            reference: TargetRef::Collection(records),
            fields: None,
        });
    }

    /// Complete the most recently opened pending target
    pub fn attach_fields<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = self
            .targets
            .iter_mut()
            .rev()
            .find(|t| t.is_pending())
            .ok_or(Error::NoPendingTarget)?;

        target.fields = Some(names.into_iter().map(Into::into).collect());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Take every registered target, leaving the registry empty
    pub fn drain(&mut self) -> Vec<Target<'r>> {
        std::mem::take(&mut self.targets)
    }
}
