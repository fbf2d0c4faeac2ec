//! In-memory source and store shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use fx_ingest::adapters::database::{ObservationStore, StageInsertResult};
use fx_ingest::adapters::valet::{ObservationSource, ObservationsPayload, RawObservation};
use fx_ingest::config::{parse_config, IngestConfig};
use fx_ingest::domain::{IngestError, Observation, ProviderError, Result, SeriesId, WarehouseError};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn series(id: &str) -> SeriesId {
    SeriesId::new(id).unwrap()
}

/// Minimal valid config; tables and connection are never touched
pub fn test_config() -> IngestConfig {
    parse_config(
        r#"
[ingestion]
backfill_start = "2019-01-01"

[warehouse]
connection_string = "postgresql://fx:fx@localhost:5432/warehouse"
"#,
    )
    .unwrap()
}

/// Provider fake holding per-series records, filtered by the requested range
///
/// An inverted range is answered with a 400, like the real API.
#[derive(Default)]
pub struct FakeValet {
    records: Mutex<HashMap<String, Vec<RawObservation>>>,
    failing: Mutex<HashMap<String, u16>>,
    requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl FakeValet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value; `None` mimics a holiday record without a value
    pub fn publish(&self, series_id: &str, d: &str, value: Option<&str>) {
        let record = match value {
            Some(v) => RawObservation::new(d, &series(series_id), v),
            None => RawObservation {
                d: Some(d.to_string()),
                ..Default::default()
            },
        };
        self.records
            .lock()
            .unwrap()
            .entry(series_id.to_string())
            .or_default()
            .push(record);
    }

    /// Publish a record that has no date at all
    pub fn publish_undated(&self, series_id: &str, value: &str) {
        let mut record = RawObservation::new("", &series(series_id), value);
        record.d = None;
        self.records
            .lock()
            .unwrap()
            .entry(series_id.to_string())
            .or_default()
            .push(record);
    }

    /// Answer every request for `series_id` with this HTTP status
    pub fn fail_with(&self, series_id: &str, status: u16) {
        self.failing
            .lock()
            .unwrap()
            .insert(series_id.to_string(), status);
    }

    pub fn requests(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_series(&self) -> Vec<String> {
        self.requests().into_iter().map(|(s, _, _)| s).collect()
    }
}

#[async_trait]
impl ObservationSource for FakeValet {
    async fn fetch(
        &self,
        series_id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationsPayload> {
        self.requests
            .lock()
            .unwrap()
            .push((series_id.to_string(), start, end));

        if let Some(status) = self.failing.lock().unwrap().get(series_id.as_str()) {
            return Err(ProviderError::from_status(*status, "scripted failure").into());
        }

        if start > end {
            return Err(ProviderError::from_status(400, "start_date is after end_date").into());
        }

        let observations = self
            .records
            .lock()
            .unwrap()
            .get(series_id.as_str())
            .map(|records| {
                records
                    .iter()
                    .filter(|r| match r.date().and_then(|d| d.parse::<NaiveDate>().ok()) {
                        Some(d) => d >= start && d <= end,
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(ObservationsPayload { observations })
    }
}

/// Warehouse fake with a staging buffer and a keyed raw table
#[derive(Default)]
pub struct InMemoryWarehouse {
    stage: Mutex<Vec<Observation>>,
    raw: Mutex<BTreeMap<(SeriesId, NaiveDate), Observation>>,
    calls: Mutex<Vec<String>>,
    short_insert: Mutex<HashSet<String>>,
    failing_watermark: Mutex<HashSet<String>>,
    failing_merge: Mutex<HashSet<String>>,
    raw_table_missing: Mutex<bool>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the raw table directly
    pub fn seed(&self, row: Observation) {
        self.raw
            .lock()
            .unwrap()
            .insert((row.series_id.clone(), row.observation_date), row);
    }

    /// Staging inserts containing this series report one row short
    pub fn short_insert_for(&self, series_id: &str) {
        self.short_insert
            .lock()
            .unwrap()
            .insert(series_id.to_string());
    }

    pub fn fail_watermark_for(&self, series_id: &str) {
        self.failing_watermark
            .lock()
            .unwrap()
            .insert(series_id.to_string());
    }

    /// Watermark reads report the raw table as not created yet
    pub fn without_raw_table(&self) {
        *self.raw_table_missing.lock().unwrap() = true;
    }

    pub fn fail_merge_for(&self, series_id: &str) {
        self.failing_merge
            .lock()
            .unwrap()
            .insert(series_id.to_string());
    }

    /// Raw table contents in key order
    pub fn raw_rows(&self) -> Vec<Observation> {
        self.raw.lock().unwrap().values().cloned().collect()
    }

    pub fn raw_rows_for(&self, series_id: &str) -> Vec<Observation> {
        self.raw_rows()
            .into_iter()
            .filter(|r| r.series_id.as_str() == series_id)
            .collect()
    }

    pub fn stage_rows(&self) -> Vec<Observation> {
        self.stage.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Write calls only (truncate, insert, merge)
    pub fn write_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("max:") && c != "test_connection" && c != "ensure_schema")
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl ObservationStore for InMemoryWarehouse {
    async fn test_connection(&self) -> Result<()> {
        self.record("test_connection");
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.record("ensure_schema");
        Ok(())
    }

    async fn max_observation_date(&self, series_id: &SeriesId) -> Result<Option<NaiveDate>> {
        self.record(format!("max:{series_id}"));

        if self.failing_watermark.lock().unwrap().contains(series_id.as_str()) {
            return Err(WarehouseError::QueryFailed("permission denied".into()).into());
        }

        if *self.raw_table_missing.lock().unwrap() {
            return Err(WarehouseError::MissingTable(
                "relation \"raw.boc_fx_observations\" does not exist (42P01)".into(),
            )
            .into());
        }

        Ok(self
            .raw
            .lock()
            .unwrap()
            .keys()
            .filter(|(s, _)| s == series_id)
            .map(|(_, d)| *d)
            .max())
    }

    async fn truncate_stage(&self) -> Result<()> {
        self.record("truncate");
        self.stage.lock().unwrap().clear();
        Ok(())
    }

    async fn insert_stage(&self, rows: &[Observation]) -> Result<StageInsertResult> {
        self.record(format!("insert:{}", rows.len()));

        let short = {
            let short_insert = self.short_insert.lock().unwrap();
            rows.iter().any(|r| short_insert.contains(r.series_id.as_str()))
        };

        if short {
            let kept = &rows[..rows.len() - 1];
            self.stage.lock().unwrap().extend_from_slice(kept);
            return Ok(StageInsertResult {
                inserted: kept.len(),
                failures: vec!["row rejected by store".to_string()],
            });
        }

        self.stage.lock().unwrap().extend_from_slice(rows);
        Ok(StageInsertResult::complete(rows.len()))
    }

    async fn merge_stage(&self) -> Result<u64> {
        self.record("merge");

        let stage = self.stage.lock().unwrap().clone();
        {
            let failing = self.failing_merge.lock().unwrap();
            if let Some(row) = stage.iter().find(|r| failing.contains(r.series_id.as_str())) {
                return Err(IngestError::from(WarehouseError::MergeFailed(format!(
                    "constraint violation for {}",
                    row.series_id
                ))));
            }
        }

        let mut raw = self.raw.lock().unwrap();
        for row in &stage {
            raw.insert((row.series_id.clone(), row.observation_date), row.clone());
        }

        Ok(stage.len() as u64)
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
