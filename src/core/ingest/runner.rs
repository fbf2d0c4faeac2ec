//! Ingestion runner - main orchestrator for a run
//!
//! This module drives each requested series through resolve, fetch,
//! normalize and load, strictly one series at a time, and collects the
//! results into a [`RunSummary`].

use crate::adapters::database::{create_observation_store, ObservationStore};
use crate::adapters::valet::{ObservationSource, ObservationsPayload, ValetClient};
use crate::config::IngestConfig;
use crate::core::ingest::loader::StageMergeLoader;
use crate::core::ingest::summary::{
    FailureStage, RunSummary, SeriesFailure, SeriesOutcome, SeriesStatus,
};
use crate::core::normalize::Normalizer;
use crate::core::watermark::WatermarkResolver;
use crate::domain::{IngestError, IngestionMode, ProviderError, Result, SeriesId};
use crate::{log_series_complete, log_series_failure, log_series_start};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

/// What to ingest in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    /// Series in processing order
    pub series: Vec<SeriesId>,

    pub mode: IngestionMode,

    /// Explicit start date; only used for backfill
    pub start_date: Option<NaiveDate>,

    /// Explicit end date; only used for backfill
    pub end_date: Option<NaiveDate>,
}

impl RunParameters {
    /// Parameters taken entirely from configuration
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            series: config.ingestion.series.clone(),
            mode: config.ingestion.mode,
            start_date: None,
            end_date: None,
        }
    }
}

/// Ingestion runner
pub struct IngestionRunner {
    source: Arc<dyn ObservationSource + Send + Sync>,
    store: Arc<dyn ObservationStore + Send + Sync>,
    resolver: WatermarkResolver,
    normalizer: Normalizer,
    loader: StageMergeLoader,
    halt_on_error: bool,
    shutdown: watch::Receiver<bool>,
}

impl IngestionRunner {
    /// Create a runner talking to the configured provider and warehouse
    ///
    /// No remote call is made here; use [`IngestionRunner::prepare`] to check
    /// connectivity.
    pub fn new(config: &IngestConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let source = Arc::new(ValetClient::new(&config.provider)?);
        let store = create_observation_store(config)?;
        Ok(Self::with_components(config, source, store, shutdown))
    }

    /// Create a runner over explicit source and store implementations
    pub fn with_components(
        config: &IngestConfig,
        source: Arc<dyn ObservationSource + Send + Sync>,
        store: Arc<dyn ObservationStore + Send + Sync>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let dry_run = config.application.dry_run;

        Self {
            resolver: WatermarkResolver::new(store.clone(), config.ingestion.backfill_start),
            normalizer: Normalizer::new(
                config.ingestion.malformed_records,
                config.provider.source_label.clone(),
            ),
            loader: StageMergeLoader::new(store.clone(), dry_run),
            halt_on_error: config.ingestion.halt_on_error,
            source,
            store,
            shutdown,
        }
    }

    /// Override dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.loader = StageMergeLoader::new(self.store.clone(), dry_run);
        self
    }

    /// Override halt-on-error
    pub fn with_halt_on_error(mut self, halt_on_error: bool) -> Self {
        self.halt_on_error = halt_on_error;
        self
    }

    /// Check the warehouse connection and create missing tables
    ///
    /// Table creation is skipped in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns the store error; connection failures satisfy
    /// [`IngestError::is_connection_error`].
    pub async fn prepare(&self) -> Result<()> {
        self.store.test_connection().await?;

        if self.loader.is_dry_run() {
            tracing::info!("DRY RUN: Skipping schema creation");
        } else {
            self.store.ensure_schema().await?;
        }

        Ok(())
    }

    /// Execute a run
    ///
    /// Series are processed in the given order. A failed series is recorded
    /// and, unless halt-on-error is set, the remaining series still run. A
    /// shutdown signal is honoured between series only.
    pub async fn run(&self, params: &RunParameters, today: NaiveDate) -> RunSummary {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let ingested_at = Utc::now();
        let mut summary = RunSummary::new(run_id, params.mode, self.loader.is_dry_run());

        tracing::info!(
            run_id = %run_id,
            mode = %params.mode,
            series_count = params.series.len(),
            today = %today,
            dry_run = self.loader.is_dry_run(),
            "Starting ingestion run"
        );

        if params.mode == IngestionMode::Incremental
            && (params.start_date.is_some() || params.end_date.is_some())
        {
            tracing::warn!(
                run_id = %run_id,
                "Explicit start/end dates are ignored in incremental mode"
            );
        }

        for (index, series_id) in params.series.iter().enumerate() {
            if *self.shutdown.borrow() {
                tracing::warn!(
                    run_id = %run_id,
                    remaining = params.series.len() - index,
                    "Shutdown requested, skipping remaining series"
                );
                summary.interrupted = true;
                skip_remaining(&mut summary, &params.series[index..]);
                break;
            }

            let span = tracing::info_span!("series", run_id = %run_id, series_id = %series_id);
            let mut outcome = SeriesOutcome::pending(series_id.clone());

            let result = self
                .process_series(series_id, params, today, ingested_at, &mut outcome)
                .instrument(span)
                .await;

            match result {
                Ok(()) => summary.record(outcome),
                Err(failure) => {
                    log_series_failure!(failure.series_id, failure.stage, failure.message);
                    outcome.status = SeriesStatus::Failed;
                    summary.record(outcome);
                    summary.add_failure(failure);

                    if self.halt_on_error {
                        tracing::warn!(
                            run_id = %run_id,
                            "Halting run after first failure"
                        );
                        skip_remaining(&mut summary, &params.series[index + 1..]);
                        break;
                    }
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }

    /// Run one series through the pipeline, filling in `outcome` as it goes
    async fn process_series(
        &self,
        series_id: &SeriesId,
        params: &RunParameters,
        today: NaiveDate,
        ingested_at: DateTime<Utc>,
        outcome: &mut SeriesOutcome,
    ) -> std::result::Result<(), SeriesFailure> {
        let started = Instant::now();
        let fail = |stage: FailureStage, err: &IngestError| {
            SeriesFailure::new(series_id.clone(), stage, err)
        };

        let request = self
            .resolver
            .resolve(series_id, params.mode, params.start_date, params.end_date, today)
            .await
            .map_err(|e| fail(FailureStage::Resolve, &e))?;
        outcome.start_date = Some(request.start_date);
        outcome.end_date = Some(request.end_date);

        log_series_start!(&request);

        let payload = match self
            .source
            .fetch(series_id, request.start_date, request.end_date)
            .await
        {
            Ok(payload) => payload,
            // A 4xx for an inverted range means there is nothing to load
            Err(IngestError::Provider(ProviderError::ClientError { status, .. }))
                if request.is_inverted() =>
            {
                tracing::debug!(status, "Provider rejected inverted range");
                ObservationsPayload::default()
            }
            Err(e) => return Err(fail(FailureStage::Fetch, &e)),
        };
        outcome.records_fetched = payload.len();

        let batch = self
            .normalizer
            .normalize(&payload, series_id, ingested_at)
            .map_err(|e| fail(FailureStage::Normalize, &IngestError::from(e)))?;
        outcome.records_skipped = batch.skipped;

        if batch.rows.is_empty() {
            tracing::info!(
                records = payload.len(),
                skipped = batch.skipped,
                "No new observations"
            );
            outcome.status = SeriesStatus::Empty;
            return Ok(());
        }

        let merged = self
            .loader
            .load(batch.rows)
            .await
            .map_err(|e| fail(FailureStage::of_load_error(&e), &e))?;

        outcome.rows_merged = merged;
        outcome.status = SeriesStatus::Loaded;
        log_series_complete!(series_id, merged, started.elapsed());

        Ok(())
    }
}

fn skip_remaining(summary: &mut RunSummary, remaining: &[SeriesId]) {
    for series_id in remaining {
        summary.record(SeriesOutcome::skipped(series_id.clone()));
    }
}
