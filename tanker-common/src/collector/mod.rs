//! Batched reference resolution
//!
//! A [`Collector`] gathers reference fields from caller-owned records, resolves
//! every distinct identifier with a single call to its [`Fetcher`], and writes
//! the fetched records back next to the original field under `field + suffix`.
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn demo(fetcher: impl tanker_common::Fetcher) -> tanker_common::Result<()> {
//! use serde_json::json;
//! use tanker_common::{Collector, Record};
//!
//! let mut post: Record = json!({"author": 2}).as_object().cloned().unwrap();
//! let mut comments: Vec<Record> = vec![json!({"author": 1}).as_object().cloned().unwrap()];
//!
//! let mut collector = Collector::new(fetcher);
//! collector
//!     .item(&mut post)
//!     .fields(["author"])?
//!     .collection(&mut comments)
//!     .fields(["author"])?
//!     .fill()
//!     .await?;
//!
//! // post["author_data"] now holds the record fetched for id 2
//! # Ok(())
//! # }
//! ```
//!
//! Records are borrowed by a [`Batch`] until it is flushed with
//! [`Batch::fill`] or [`Batch::get`]; flushing consumes the batch, so the
//! registry always starts clean for the next one.

pub mod aggregate;
pub mod fetch;
pub mod merge;
pub mod normalize;
pub mod registry;
pub mod types;

use tracing::{debug, warn};

use crate::config::CollectorConfig;
use crate::{Error, Result};

use self::aggregate::aggregate;
use self::fetch::{resolve, Fetcher};
use self::merge::merge;
use self::registry::{Target, TargetRegistry};
use self::types::{IdSet, Identifier, Record, Resolved};

/// Outcome of a [`Batch::fill`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Distinct identifiers sent to the fetch capability
    pub requested: usize,
    /// Identifiers the fetch capability returned a record for
    pub resolved: usize,
    /// Requested identifiers with no fetched record, in identifier order
    pub unresolved: Vec<Identifier>,
}

impl FillReport {
    fn new(ids: &IdSet, resolved: &Resolved) -> Self {
        let unresolved: Vec<Identifier> = ids
            .iter()
            .filter(|id| !resolved.contains_key(*id))
            .cloned()
            .collect();

        Self {
            requested: ids.len(),
            resolved: ids.len() - unresolved.len(),
            unresolved,
        }
    }
}

/// Resolves reference fields through an injected fetch capability
#[derive(Debug)]
pub struct Collector<F> {
    fetcher: F,
    config: CollectorConfig,
}

impl<F: Fetcher> Collector<F> {
    /// Create a collector with the default `_data` suffix and no projection
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: CollectorConfig::default(),
        }
    }

    /// Create a collector from an explicit configuration
    pub fn with_config(fetcher: F, config: CollectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { fetcher, config })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn suffix(&self) -> &str {
        &self.config.suffix
    }

    /// Change the suffix used by every later merge
    ///
    /// An empty suffix is rejected: the derived key would overwrite the field.
    pub fn set_suffix(&mut self, suffix: impl Into<String>) -> Result<&mut Self> {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Err(Error::InvalidInput("suffix must not be empty".to_string()));
        }
        self.config.suffix = suffix;
        Ok(self)
    }

    /// Restrict the records of the next fetch to these attributes
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Projection waiting for the next flush, if any
    pub fn projection(&self) -> Option<&[String]> {
        self.config.projection.as_deref()
    }

    /// Start an empty batch
    pub fn batch<'r>(&mut self) -> Batch<'_, 'r, F> {
        Batch {
            collector: self,
            registry: TargetRegistry::new(),
        }
    }

    /// Start a batch with a single record pending
    pub fn item<'r>(&mut self, record: &'r mut Record) -> Batch<'_, 'r, F> {
        self.batch().item(record)
    }

    /// Start a batch with a collection of records pending
    pub fn collection<'r>(&mut self, records: &'r mut [Record]) -> Batch<'_, 'r, F> {
        self.batch().collection(records)
    }

    /// The one fetch of a flush; the projection is consumed whatever the outcome
    async fn resolve_ids(&mut self, ids: &IdSet) -> Result<Resolved> {
        let projection = self.config.projection.take();
        resolve(&self.fetcher, ids, projection.as_deref()).await
    }
}

/// Targets registered against a collector, waiting to be flushed
#[derive(Debug)]
pub struct Batch<'c, 'r, F> {
    collector: &'c mut Collector<F>,
    registry: TargetRegistry<'r>,
}

impl<'c, 'r, F: Fetcher> Batch<'c, 'r, F> {
    /// Open a pending target for one record
    pub fn item(mut self, record: &'r mut Record) -> Self {
        self.registry.push_item(record);
        self
    }

    /// Open a pending target for an ordered collection of records
    pub fn collection(mut self, records: &'r mut [Record]) -> Self {
        self.registry.push_collection(records);
        self
    }

    /// Attach field names to the most recently opened pending target
    pub fn fields<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.attach_fields(names)?;
        Ok(self)
    }

    /// See [`Collector::select`]
    pub fn select<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collector.select(columns);
        self
    }

    /// See [`Collector::set_suffix`]
    pub fn set_suffix(self, suffix: impl Into<String>) -> Result<Self> {
        self.collector.set_suffix(suffix)?;
        Ok(self)
    }

    /// Number of registered targets, pending ones included
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Resolve all registered fields and write the results into the records
    pub async fn fill(mut self) -> Result<FillReport> {
        let mut targets = self.take_targets();
        let aggregate = aggregate(&targets);
        let resolved = self.collector.resolve_ids(&aggregate.ids).await?;

        merge(&mut targets, &aggregate, &resolved, &self.collector.config.suffix);

        let report = FillReport::new(&aggregate.ids, &resolved);
        if !report.unresolved.is_empty() {
            debug!("{} identifier(s) unresolved: {:?}", report.unresolved.len(), report.unresolved);
        }
        Ok(report)
    }

    /// Resolve all registered fields without touching the records
    pub async fn get(mut self) -> Result<Resolved> {
        let targets = self.take_targets();
        let aggregate = aggregate(&targets);
        self.collector.resolve_ids(&aggregate.ids).await
    }

    fn take_targets(&mut self) -> Vec<Target<'r>> {
        let targets = self.registry.drain();
        let registered = targets.len();

        let targets: Vec<Target<'r>> = targets
            .into_iter()
            .filter(|target| {
                if target.is_pending() {
                    warn!("Skipping {:?} target registered without fields", target.reference.kind());
                    false
                } else {
                    true
                }
            })
            .collect();

        debug!("Flushing {} of {} registered target(s)", targets.len(), registered);
        targets
    }
}
