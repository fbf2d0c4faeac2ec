//! Ingestion request model

use crate::domain::{IngestionMode, SeriesId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date range to fetch for one series
///
/// Produced by the watermark resolver and consumed by the fetcher. A request
/// with `start_date > end_date` is valid and is still sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionRequest {
    pub series_id: SeriesId,
    pub mode: IngestionMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl IngestionRequest {
    pub fn new(
        series_id: SeriesId,
        mode: IngestionMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            series_id,
            mode,
            start_date,
            end_date,
        }
    }

    /// Whether the range is empty because start is after end
    ///
    /// This happens on an incremental run when the series is already loaded
    /// up to today.
    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }
}

impl fmt::Display for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}..{}",
            self.series_id, self.mode, self.start_date, self.end_date
        )
    }
}
