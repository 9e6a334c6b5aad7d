//! Table lookup fetcher

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use super::rows::{is_valid_name, row_to_record};
use crate::collector::fetch::Fetcher;
use crate::collector::types::{IdSet, Identifier, Resolved};
use crate::{Error, Result};

/// Resolves identifiers to rows of one SQLite table
#[derive(Debug, Clone)]
pub struct SqliteFetcher {
    pool: SqlitePool,
    table: String,
    id_column: String,
}

impl SqliteFetcher {
    /// Create a fetcher for `table`, keyed by `id_column`
    ///
    /// Both names are validated since they are spliced into the query text.
    pub fn new(pool: SqlitePool, table: impl Into<String>, id_column: impl Into<String>) -> Result<Self> {
        let table = table.into();
        let id_column = id_column.into();

        if !is_valid_name(&table) {
            return Err(Error::InvalidInput(format!("Invalid table name: {}", table)));
        }
        if !is_valid_name(&id_column) {
            return Err(Error::InvalidInput(format!("Invalid column: {}", id_column)));
        }

        Ok(Self {
            pool,
            table,
            id_column,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Build the lookup query for `count` identifiers
    fn build_query(&self, count: usize, columns: Option<&[String]>) -> Result<String> {
        let select_list = match columns {
            None => "*".to_string(),
            Some(columns) => {
                let mut list = vec![self.id_column.clone()];
                for column in columns {
                    if !is_valid_name(column) {
                        return Err(Error::InvalidInput(format!("Invalid column: {}", column)));
                    }
                    if !list.contains(column) {
                        list.push(column.clone());
                    }
                }
                list.join(", ")
            }
        };

        let placeholders = vec!["?"; count].join(", ");
        Ok(format!(
            "SELECT {} FROM {} WHERE {} IN ({})",
            select_list, self.table, self.id_column, placeholders
        ))
    }
}

#[async_trait]
impl Fetcher for SqliteFetcher {
    async fn fetch(&self, ids: &IdSet, columns: Option<&[String]>) -> Result<Resolved> {
        if ids.is_empty() {
            return Ok(Resolved::new());
        }

        let sql = self.build_query(ids.len(), columns)?;
        debug!("Fetcher query: {}", sql);

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = match id {
                Identifier::Int(i) => query.bind(*i),
                Identifier::Str(s) => query.bind(s.as_str()),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;

        // SQLite affinity may return 2 for a requested "2": match on display form.
        // 2 and "2" can both be requested, so one row may answer several ids.
        let mut requested: HashMap<String, Vec<&Identifier>> = HashMap::new();
        for id in ids {
            requested.entry(id.to_string()).or_default().push(id);
        }
        let keep_id_column = columns.map_or(true, |cols| cols.contains(&self.id_column));

        let mut resolved = Resolved::with_capacity(rows.len());
        for row in &rows {
            let mut record = row_to_record(row);
            let key = match record.get(&self.id_column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => continue,
                Some(other) => other.to_string(),
            };
            let Some(matching) = requested.get(&key) else {
                continue;
            };

            if !keep_id_column {
                record.remove(&self.id_column);
            }
            for id in matching {
                resolved.insert((*id).clone(), record.clone());
            }
        }

        Ok(resolved)
    }
}
