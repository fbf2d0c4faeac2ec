//! Warehouse abstraction traits
//!
//! This module defines the trait a warehouse adapter must implement for the
//! ingestion pipeline. The durable raw table is only written through
//! [`ObservationStore::merge_stage`].

use crate::domain::{Observation, Result, SeriesId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Result of a staging insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInsertResult {
    /// Number of rows that landed in the staging table
    pub inserted: usize,

    /// Row-level error messages reported by the store
    pub failures: Vec<String>,
}

impl StageInsertResult {
    /// A fully successful insert of `inserted` rows
    pub fn complete(inserted: usize) -> Self {
        Self {
            inserted,
            failures: Vec::new(),
        }
    }

    /// Whether every one of `expected` rows was inserted without error
    pub fn is_complete(&self, expected: usize) -> bool {
        self.failures.is_empty() && self.inserted == expected
    }
}

/// Warehouse operations used by the watermark resolver and the loader
///
/// Implementations must be safe to share behind an `Arc`, but the pipeline
/// never issues two calls at once.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Test the warehouse connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create the schema, raw table and staging table if missing
    ///
    /// # Errors
    ///
    /// Returns an error if any of the objects cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Latest stored observation date for a series
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the series has no rows yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::WarehouseError::MissingTable`] if the raw
    /// table has not been created yet, and
    /// [`crate::domain::WarehouseError::QueryFailed`] for any other failure.
    async fn max_observation_date(&self, series_id: &SeriesId) -> Result<Option<NaiveDate>>;

    /// Remove every row from the staging table
    async fn truncate_stage(&self) -> Result<()>;

    /// Insert `rows` into the staging table as one batch
    ///
    /// Row-level problems are reported in the returned
    /// [`StageInsertResult`] rather than as an error.
    async fn insert_stage(&self, rows: &[Observation]) -> Result<StageInsertResult>;

    /// Upsert the staging table into the raw table
    ///
    /// Matching `(series_id, observation_date)` keys get `value`,
    /// `ingested_at` and `source` overwritten; other rows are inserted.
    ///
    /// # Returns
    ///
    /// Number of raw-table rows affected.
    async fn merge_stage(&self) -> Result<u64>;

    /// Human-readable target, safe to log
    fn describe(&self) -> String;
}
