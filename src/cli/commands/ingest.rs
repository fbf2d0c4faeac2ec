//! Ingest command implementation
//!
//! This module implements the `ingest` command, which loads new
//! observations from the Valet API into the warehouse raw table.

use crate::config::{load_config, IngestConfig};
use crate::core::ingest::{IngestionRunner, RunParameters, RunSummary, SeriesStatus};
use crate::domain::{IngestionMode, SeriesId};
use chrono::NaiveDate;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the ingest command
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Series to load, in order (space or comma separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub series: Vec<SeriesId>,

    /// Override ingestion mode (incremental or backfill)
    #[arg(long)]
    pub mode: Option<IngestionMode>,

    /// First date to load (backfill only, YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last date to load (backfill only, YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Dry run mode - fetch and normalize without writing to the warehouse
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failing series
    #[arg(long)]
    pub halt_on_error: bool,
}

impl IngestArgs {
    /// Apply command-line overrides to the loaded configuration
    pub fn apply_overrides(&self, config: &mut IngestConfig) {
        if !self.series.is_empty() {
            tracing::info!(series = ?self.series, "Overriding series from CLI");
            config.ingestion.series = self.series.clone();
        }

        if let Some(mode) = self.mode {
            tracing::info!(mode = %mode, "Overriding ingestion mode from CLI");
            config.ingestion.mode = mode;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if self.halt_on_error {
            config.ingestion.halt_on_error = true;
        }
    }

    /// Run parameters for an already-overridden configuration
    pub fn run_parameters(&self, config: &IngestConfig) -> RunParameters {
        RunParameters {
            start_date: self.start_date,
            end_date: self.end_date,
            ..RunParameters::from_config(config)
        }
    }

    /// Execute the ingest command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end && config.ingestion.mode == IngestionMode::Backfill {
                eprintln!("--start-date {start} is after --end-date {end}");
                return Ok(2);
            }
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the warehouse");
            println!();
        }

        let runner = match IngestionRunner::new(&config, shutdown_signal) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create ingestion runner");
                eprintln!("Failed to initialize ingestion: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = runner.prepare().await {
            tracing::error!(error = %e, "Warehouse preparation failed");
            eprintln!("Failed to prepare warehouse: {e}");
            return Ok(if e.is_connection_error() { 4 } else { 5 });
        }

        println!("🚀 Starting ingestion...");
        println!();

        let params = self.run_parameters(&config);
        let today = chrono::Local::now().date_naive();
        let summary = runner.run(&params, today).await;

        print_summary(&summary);

        Ok(exit_code(&summary))
    }
}

/// Process exit code for a finished run
///
/// An interrupted run reports `130` even if some series failed before the
/// signal arrived.
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        130
    } else if summary.is_successful() {
        0
    } else {
        1
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Ingestion Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Mode: {}", summary.mode);
    println!("  Series: {}", summary.outcomes.len());
    println!("  Loaded: {}", summary.count(SeriesStatus::Loaded));
    println!("  Empty: {}", summary.count(SeriesStatus::Empty));
    println!("  Failed: {}", summary.count(SeriesStatus::Failed));
    println!("  Skipped: {}", summary.count(SeriesStatus::Skipped));
    println!("  Rows Merged: {}", summary.total_merged());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    println!(
        "{:<14} {:<10} {:<12} {:<12} {:>8} {:>8} {:>8}",
        "Series", "Status", "Start", "End", "Fetched", "Skipped", "Merged"
    );
    println!("{}", "-".repeat(80));

    for outcome in &summary.outcomes {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "{:<14} {:<10} {:<12} {:<12} {:>8} {:>8} {:>8}",
            outcome.series_id.as_str(),
            outcome.status,
            date(outcome.start_date),
            date(outcome.end_date),
            outcome.records_fetched,
            outcome.records_skipped,
            outcome.rows_merged
        );
    }
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failures:");
        for failure in &summary.failures {
            println!(
                "  - {} ({}): {}",
                failure.series_id, failure.stage, failure.message
            );
        }
        println!();
    }

    if summary.interrupted {
        println!("⚠️  Run interrupted - remaining series were skipped");
    } else if summary.is_successful() {
        println!("✅ Ingestion completed successfully");
    } else {
        println!("❌ Ingestion completed with failures");
    }
}
