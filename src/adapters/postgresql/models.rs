//! PostgreSQL row models
//!
//! Staging rows are shipped to the server as one JSON array and expanded with
//! `jsonb_to_recordset`, so the row model only has to serialize.

use crate::domain::{IngestError, Observation, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// One staging-table row in its JSON shape
///
/// Field names match the staging table columns. `value` serializes as a
/// string so the server parses it straight into `numeric` without a float
/// round-trip.
#[derive(Debug, Clone, Serialize)]
pub struct PostgreSQLStageRow<'a> {
    pub series_id: &'a str,
    pub observation_date: NaiveDate,
    pub value: Decimal,
    pub ingested_at: DateTime<Utc>,
    pub source: &'a str,
}

impl<'a> From<&'a Observation> for PostgreSQLStageRow<'a> {
    fn from(row: &'a Observation) -> Self {
        Self {
            series_id: row.series_id.as_str(),
            observation_date: row.observation_date,
            value: row.value,
            ingested_at: row.ingested_at,
            source: &row.source,
        }
    }
}

/// Build the `$1::jsonb` parameter for the staging insert
pub fn stage_payload(rows: &[Observation]) -> Result<Value> {
    let rows: Vec<PostgreSQLStageRow<'_>> = rows.iter().map(PostgreSQLStageRow::from).collect();
    serde_json::to_value(rows).map_err(|e| {
        IngestError::Serialization(format!("Failed to encode staging rows: {e}"))
    })
}
