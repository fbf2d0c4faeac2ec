//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with an `EnvFilter` (`RUST_LOG` or `fx_ingest=<level>`)
//! - JSON-formatted local files with daily or hourly rotation
//! - Per-run and per-series spans carrying `run_id` and `series_id`
//!
//! # Example
//!
//! ```no_run
//! use fx_ingest::logging::init_logging;
//! use fx_ingest::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(series_id = "FXUSDCAD", "Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a series load
///
/// # Example
///
/// ```no_run
/// use fx_ingest::log_series_start;
/// use fx_ingest::core::watermark::IngestionRequest;
/// use fx_ingest::domain::{IngestionMode, SeriesId};
/// use chrono::NaiveDate;
///
/// let request = IngestionRequest::new(
///     SeriesId::new("FXUSDCAD").unwrap(),
///     IngestionMode::Incremental,
///     NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
/// );
/// log_series_start!(&request);
/// ```
#[macro_export]
macro_rules! log_series_start {
    ($request:expr) => {
        tracing::info!(
            series_id = %$request.series_id,
            mode = %$request.mode,
            start_date = %$request.start_date,
            end_date = %$request.end_date,
            "Loading series"
        );
    };
}

/// Log the completion of a series load
///
/// # Example
///
/// ```no_run
/// use fx_ingest::log_series_complete;
/// use std::time::Duration;
///
/// log_series_complete!("FXUSDCAD", 42, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_series_complete {
    ($series_id:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            series_id = %$series_id,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Series loaded"
        );
    };
}

/// Log a series failure with the stage it failed in
///
/// # Example
///
/// ```no_run
/// use fx_ingest::log_series_failure;
///
/// log_series_failure!("FXUSDCAD", "fetch", "Server error: 503");
/// ```
#[macro_export]
macro_rules! log_series_failure {
    ($series_id:expr, $stage:expr, $error:expr) => {
        tracing::error!(
            series_id = %$series_id,
            stage = %$stage,
            error = %$error,
            "Series failed"
        );
    };
}
