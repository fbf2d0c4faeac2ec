//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting the result of
//! one ingestion run.

use crate::domain::{IngestError, IngestionMode, SeriesId, WarehouseError};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Pipeline step a series failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Watermark lookup
    Resolve,
    /// Provider request
    Fetch,
    /// Payload to rows
    Normalize,
    /// Staging truncate or insert
    Stage,
    /// Merge into the raw table
    Merge,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Resolve => "resolve",
            FailureStage::Fetch => "fetch",
            FailureStage::Normalize => "normalize",
            FailureStage::Stage => "stage",
            FailureStage::Merge => "merge",
        }
    }

    /// Attribute a loader error to staging or merging
    pub fn of_load_error(err: &IngestError) -> Self {
        match err {
            IngestError::Warehouse(WarehouseError::MergeFailed(_)) => FailureStage::Merge,
            _ => FailureStage::Stage,
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed series with the stage and cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesFailure {
    pub series_id: SeriesId,
    pub stage: FailureStage,
    pub message: String,
}

impl SeriesFailure {
    pub fn new(series_id: SeriesId, stage: FailureStage, error: &IngestError) -> Self {
        Self {
            series_id,
            stage,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for SeriesFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed at {}: {}", self.series_id, self.stage, self.message)
    }
}

/// Final state of one series in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    /// Rows were staged and merged
    Loaded,
    /// Provider returned nothing usable; no store writes
    Empty,
    /// A step failed
    Failed,
    /// Not attempted (halt-on-error or shutdown)
    Skipped,
}

impl SeriesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Loaded => "loaded",
            SeriesStatus::Empty => "empty",
            SeriesStatus::Failed => "failed",
            SeriesStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-series result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesOutcome {
    pub series_id: SeriesId,
    pub status: SeriesStatus,

    /// Resolved range, once known
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    /// Raw records returned by the provider
    pub records_fetched: usize,

    /// Records dropped by the normalizer
    pub records_skipped: usize,

    /// Rows staged and merged
    pub rows_merged: usize,
}

impl SeriesOutcome {
    /// Outcome for a series that has not finished yet
    pub fn pending(series_id: SeriesId) -> Self {
        Self {
            series_id,
            status: SeriesStatus::Skipped,
            start_date: None,
            end_date: None,
            records_fetched: 0,
            records_skipped: 0,
            rows_merged: 0,
        }
    }

    /// Outcome for a series that was never attempted
    pub fn skipped(series_id: SeriesId) -> Self {
        Self::pending(series_id)
    }
}

/// Summary of an ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Correlates all log lines of this run
    pub run_id: Uuid,

    pub mode: IngestionMode,

    /// No store writes were made
    pub dry_run: bool,

    /// One entry per requested series, in request order
    pub outcomes: Vec<SeriesOutcome>,

    /// Errors encountered, one per failed series
    pub failures: Vec<SeriesFailure>,

    /// A shutdown signal stopped the run between series
    pub interrupted: bool,

    /// Duration of the run
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new(run_id: Uuid, mode: IngestionMode, dry_run: bool) -> Self {
        Self {
            run_id,
            mode,
            dry_run,
            outcomes: Vec::new(),
            failures: Vec::new(),
            interrupted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a finished series
    pub fn record(&mut self, outcome: SeriesOutcome) {
        self.outcomes.push(outcome);
    }

    /// Record a failure
    pub fn add_failure(&mut self, failure: SeriesFailure) {
        self.failures.push(failure);
    }

    /// Total rows merged across all series
    pub fn total_merged(&self) -> usize {
        self.outcomes.iter().map(|o| o.rows_merged).sum()
    }

    /// Number of series with the given status
    pub fn count(&self, status: SeriesStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Outcome for one series, if it was part of the run
    pub fn outcome(&self, series_id: &SeriesId) -> Option<&SeriesOutcome> {
        self.outcomes.iter().find(|o| &o.series_id == series_id)
    }

    /// Check if the run was successful (no failed series)
    ///
    /// An interrupted run without failures still counts as successful here;
    /// callers check [`RunSummary::interrupted`] separately.
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            mode = %self.mode,
            dry_run = self.dry_run,
            series = self.outcomes.len(),
            loaded = self.count(SeriesStatus::Loaded),
            empty = self.count(SeriesStatus::Empty),
            failed = self.count(SeriesStatus::Failed),
            skipped = self.count(SeriesStatus::Skipped),
            rows_merged = self.total_merged(),
            duration_ms = self.duration.as_millis() as u64,
            interrupted = self.interrupted,
            "Ingestion run completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                run_id = %self.run_id,
                series_id = %failure.series_id,
                stage = %failure.stage,
                message = %failure.message,
                "Series failure"
            );
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
