//! Fetch capability and orchestration
//!
//! The collector never knows where records live. A [`Fetcher`] turns a set of
//! identifiers (optionally narrowed to some attributes) into a map of
//! identifier to record. Identifiers it cannot resolve are simply left out.

use async_trait::async_trait;
use tracing::debug;

use super::types::{IdSet, Resolved};
use crate::Result;

/// Injected capability resolving identifiers to records
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the records for `ids`
    ///
    /// # Arguments
    /// * `ids` - Distinct, non-empty identifiers
    /// * `columns` - Attributes each returned record should be restricted to
    ///
    /// # Returns
    /// * `Ok(Resolved)` - May omit identifiers that do not exist
    /// * `Err(_)` - Backend failure, handed back to the caller unchanged
    async fn fetch(&self, ids: &IdSet, columns: Option<&[String]>) -> Result<Resolved>;
}

/// Plain functions and closures work as synchronous fetch capabilities
#[async_trait]
impl<F> Fetcher for F
where
    F: Fn(&IdSet, Option<&[String]>) -> Result<Resolved> + Send + Sync,
{
    async fn fetch(&self, ids: &IdSet, columns: Option<&[String]>) -> Result<Resolved> {
        self(ids, columns)
    }
}

/// Run the single fetch of a flush
///
/// An empty identifier set short-circuits without calling the capability.
pub async fn resolve<F>(fetcher: &F, ids: &IdSet, projection: Option<&[String]>) -> Result<Resolved>
where
    F: Fetcher + ?Sized,
{
    if ids.is_empty() {
        debug!("No identifiers to resolve, skipping fetch");
        return Ok(Resolved::new());
    }

    debug!(
        "Fetching {} identifier(s){}",
        ids.len(),
        projection
            .map(|cols| format!(" with projection [{}]", cols.join(", ")))
            .unwrap_or_default()
    );

    let resolved = fetcher.fetch(ids, projection).await?;

    debug!("Fetch returned {} of {} record(s)", resolved.len(), ids.len());
    Ok(resolved)
}
