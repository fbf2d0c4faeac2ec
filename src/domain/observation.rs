//! Observation row and ingestion mode
//!
//! [`Observation`] is the canonical row shape shared by the normalizer, the
//! staging insert and the raw table.

use crate::domain::ids::SeriesId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One daily observation of a series
///
/// `(series_id, observation_date)` is the identity of a row in the raw
/// table. Serializes to the JSON shape used for the staging insert:
///
/// ```
/// use fx_ingest::domain::{Observation, SeriesId};
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let row = Observation::new(
///     SeriesId::new("FXUSDCAD").unwrap(),
///     NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
///     Decimal::from_str("1.30").unwrap(),
///     Utc.with_ymd_and_hms(2019, 1, 2, 7, 0, 0).unwrap(),
///     "bank_of_canada_valet",
/// );
///
/// let json = serde_json::to_value(&row).unwrap();
/// assert_eq!(json["observation_date"], "2019-01-01");
/// assert_eq!(json["value"], "1.30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Series this observation belongs to
    pub series_id: SeriesId,

    /// Calendar date of the observation
    pub observation_date: NaiveDate,

    /// Observed value, kept as an exact decimal
    pub value: Decimal,

    /// When this row was produced by the current load
    pub ingested_at: DateTime<Utc>,

    /// Source label, constant per deployment
    pub source: String,
}

impl Observation {
    /// Create a new observation row
    pub fn new(
        series_id: SeriesId,
        observation_date: NaiveDate,
        value: Decimal,
        ingested_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            series_id,
            observation_date,
            value,
            ingested_at,
            source: source.into(),
        }
    }

    /// Merge key of this row
    pub fn key(&self) -> (&SeriesId, NaiveDate) {
        (&self.series_id, self.observation_date)
    }
}

/// How the date range for a series is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionMode {
    /// Load dates after the current watermark
    #[default]
    Incremental,
    /// Load an explicit range regardless of the watermark
    Backfill,
}

impl IngestionMode {
    /// Lowercase name as used on the command line and in config
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionMode::Incremental => "incremental",
            IngestionMode::Backfill => "backfill",
        }
    }
}

impl fmt::Display for IngestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incremental" => Ok(IngestionMode::Incremental),
            "backfill" => Ok(IngestionMode::Backfill),
            other => Err(format!(
                "Invalid ingestion mode '{other}'. Must be one of: incremental, backfill"
            )),
        }
    }
}
