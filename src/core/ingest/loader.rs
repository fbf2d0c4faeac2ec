//! Stage-and-merge loader
//!
//! Writes one series' rows to the raw table through the staging table:
//! truncate stage, insert the batch, verify the insert, then merge. The
//! merge is the only statement that touches the raw table, and it never runs
//! after a partial insert.

use crate::adapters::database::traits::ObservationStore;
use crate::domain::{Observation, Result, SeriesId, WarehouseError};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

/// Loads normalized rows into the durable raw table
pub struct StageMergeLoader {
    store: Arc<dyn ObservationStore + Send + Sync>,
    dry_run: bool,
}

impl StageMergeLoader {
    /// Create a new loader
    ///
    /// # Arguments
    ///
    /// * `store` - Warehouse holding the staging and raw tables
    /// * `dry_run` - If true, log what would be merged and skip all writes
    pub fn new(store: Arc<dyn ObservationStore + Send + Sync>, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Stage and merge `rows`
    ///
    /// # Returns
    ///
    /// Number of rows staged and merged after collapsing duplicate keys.
    /// An empty input returns `0` without touching the store.
    ///
    /// # Errors
    ///
    /// - [`WarehouseError::TruncateFailed`] / [`WarehouseError::InsertFailed`]
    ///   from the store
    /// - [`WarehouseError::PartialInsert`] if the store reports row failures
    ///   or fewer rows than sent; the merge is not run
    /// - [`WarehouseError::MergeFailed`] from the store
    pub async fn load(&self, rows: Vec<Observation>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let rows = dedupe_last_wins(rows);
        let count = rows.len();

        if self.dry_run {
            tracing::info!(
                rows = count,
                "DRY RUN: Would stage and merge {} rows",
                count
            );
            return Ok(count);
        }

        self.store.truncate_stage().await?;

        let result = self.store.insert_stage(&rows).await?;
        if !result.is_complete(count) {
            return Err(WarehouseError::PartialInsert {
                inserted: result.inserted,
                expected: count,
                failures: result.failures,
            }
            .into());
        }

        let affected = self.store.merge_stage().await?;

        tracing::debug!(
            staged = count,
            affected,
            "Staging table merged into raw table"
        );

        Ok(count)
    }
}

/// Collapse rows sharing `(series_id, observation_date)`
///
/// The last occurrence's values win; the position of the first occurrence
/// is kept so output order follows the provider's.
pub fn dedupe_last_wins(rows: Vec<Observation>) -> Vec<Observation> {
    let mut positions: HashMap<(SeriesId, NaiveDate), usize> = HashMap::with_capacity(rows.len());
    let mut unique: Vec<Observation> = Vec::with_capacity(rows.len());

    for row in rows {
        let key = (row.series_id.clone(), row.observation_date);
        match positions.get(&key) {
            Some(&index) => unique[index] = row,
            None => {
                positions.insert(key, unique.len());
                unique.push(row);
            }
        }
    }

    unique
}
