//! Watermark resolution
//!
//! Turns a series, a mode and optional explicit dates into the concrete
//! range to fetch. The watermark is the latest stored observation date for
//! the series; it is read fresh from the store on every call.

use super::request::IngestionRequest;
use crate::adapters::database::traits::ObservationStore;
use crate::domain::{IngestError, IngestionMode, Result, SeriesId, WarehouseError};
use chrono::NaiveDate;
use std::sync::Arc;

/// Compute the fetch range from already-known inputs
///
/// - backfill: `configured_start` or `backfill_start`, through
///   `configured_end` or `today`. The watermark is ignored.
/// - incremental with a watermark: the day after it through `today`.
/// - incremental without one: `backfill_start` through `today`; explicit
///   dates are ignored.
///
/// ```
/// use chrono::NaiveDate;
/// use fx_ingest::core::watermark::resolve_range;
/// use fx_ingest::domain::IngestionMode;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let (start, end) = resolve_range(
///     IngestionMode::Incremental,
///     Some(d(2024, 6, 1)),
///     None,
///     None,
///     d(2019, 1, 1),
///     d(2024, 6, 10),
/// );
/// assert_eq!((start, end), (d(2024, 6, 2), d(2024, 6, 10)));
/// ```
pub fn resolve_range(
    mode: IngestionMode,
    watermark: Option<NaiveDate>,
    configured_start: Option<NaiveDate>,
    configured_end: Option<NaiveDate>,
    backfill_start: NaiveDate,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match (mode, watermark) {
        (IngestionMode::Backfill, _) => (
            configured_start.unwrap_or(backfill_start),
            configured_end.unwrap_or(today),
        ),
        (IngestionMode::Incremental, Some(latest)) => {
            (latest.succ_opt().unwrap_or(latest), today)
        }
        (IngestionMode::Incremental, None) => (backfill_start, today),
    }
}

/// Resolves ingestion requests against the warehouse
pub struct WatermarkResolver {
    /// Store queried for `MAX(observation_date)`
    store: Arc<dyn ObservationStore + Send + Sync>,

    /// First date loaded when a series has no history
    backfill_start: NaiveDate,
}

impl WatermarkResolver {
    /// Create a new resolver
    ///
    /// # Arguments
    ///
    /// * `store` - Warehouse to read watermarks from
    /// * `backfill_start` - Default start date for backfills and first loads
    pub fn new(store: Arc<dyn ObservationStore + Send + Sync>, backfill_start: NaiveDate) -> Self {
        Self {
            store,
            backfill_start,
        }
    }

    /// Latest stored observation date for a series
    ///
    /// A raw table that does not exist yet has no watermark.
    ///
    /// # Errors
    ///
    /// Propagates any other store query error.
    pub async fn watermark(&self, series_id: &SeriesId) -> Result<Option<NaiveDate>> {
        match self.store.max_observation_date(series_id).await {
            Err(IngestError::Warehouse(WarehouseError::MissingTable(reason))) => {
                tracing::debug!(
                    series_id = %series_id,
                    reason = %reason,
                    "Raw table not created yet, treating as first load"
                );
                Ok(None)
            }
            other => other,
        }
    }

    /// Resolve the request for one series
    ///
    /// The store is only queried in incremental mode.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the watermark lookup fails.
    pub async fn resolve(
        &self,
        series_id: &SeriesId,
        mode: IngestionMode,
        configured_start: Option<NaiveDate>,
        configured_end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<IngestionRequest> {
        let watermark = match mode {
            IngestionMode::Incremental => self.watermark(series_id).await?,
            IngestionMode::Backfill => None,
        };

        let (start_date, end_date) = resolve_range(
            mode,
            watermark,
            configured_start,
            configured_end,
            self.backfill_start,
            today,
        );

        let request = IngestionRequest::new(series_id.clone(), mode, start_date, end_date);

        tracing::debug!(
            series_id = %series_id,
            mode = %mode,
            watermark = ?watermark,
            start_date = %start_date,
            end_date = %end_date,
            "Resolved ingestion request"
        );

        if request.is_inverted() {
            tracing::info!(
                series_id = %series_id,
                start_date = %start_date,
                end_date = %end_date,
                "Series is already up to date"
            );
        }

        Ok(request)
    }
}
