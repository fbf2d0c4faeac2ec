//! Provider payload to observation rows
//!
//! The normalizer is a pure mapping from an [`ObservationsPayload`] to
//! [`Observation`] rows. It holds no state besides its policy and source
//! label, and it takes the load timestamp as an argument so the same input
//! always produces the same rows.

use crate::adapters::valet::ObservationsPayload;
use crate::domain::{NormalizeError, Observation, SeriesId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with provider records that lack a date or a value
///
/// The provider omits values for holidays and other non-publication days,
/// so the default is to drop those records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedRecordPolicy {
    /// Drop records with a missing date or a missing/blank value
    #[default]
    SkipOnMissing,
    /// Fail the series on the first such record
    Reject,
}

/// Rows produced from one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Rows in provider order
    pub rows: Vec<Observation>,

    /// Records dropped under [`MalformedRecordPolicy::SkipOnMissing`]
    pub skipped: usize,
}

/// Maps Valet payloads to canonical rows
#[derive(Debug, Clone)]
pub struct Normalizer {
    policy: MalformedRecordPolicy,
    source_label: String,
}

impl Normalizer {
    /// Create a normalizer stamping `source_label` on every row
    pub fn new(policy: MalformedRecordPolicy, source_label: impl Into<String>) -> Self {
        Self {
            policy,
            source_label: source_label.into(),
        }
    }

    /// Convert `payload` into rows for `series_id`
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::MissingField`] for an incomplete record under
    ///   [`MalformedRecordPolicy::Reject`]
    /// - [`NormalizeError::InvalidDate`] / [`NormalizeError::InvalidValue`]
    ///   when a present field cannot be parsed, under either policy
    pub fn normalize(
        &self,
        payload: &ObservationsPayload,
        series_id: &SeriesId,
        ingested_at: DateTime<Utc>,
    ) -> Result<NormalizedBatch, NormalizeError> {
        let mut batch = NormalizedBatch {
            rows: Vec::with_capacity(payload.len()),
            skipped: 0,
        };

        for (index, record) in payload.observations.iter().enumerate() {
            let date = record.date().map(str::trim).filter(|d| !d.is_empty());
            let value = record.value_for(series_id).filter(|v| !v.trim().is_empty());

            let (date, value) = match (date, value) {
                (Some(date), Some(value)) => (date, value),
                (date, _) => {
                    let field = if date.is_none() { "date" } else { "value" };
                    match self.policy {
                        MalformedRecordPolicy::SkipOnMissing => {
                            tracing::debug!(
                                series_id = %series_id,
                                index,
                                field,
                                "Skipping provider record"
                            );
                            batch.skipped += 1;
                            continue;
                        }
                        MalformedRecordPolicy::Reject => {
                            return Err(NormalizeError::MissingField {
                                series_id: series_id.to_string(),
                                index,
                                field,
                            });
                        }
                    }
                }
            };

            let observation_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                NormalizeError::InvalidDate {
                    series_id: series_id.to_string(),
                    value: date.to_string(),
                }
            })?;

            let value = parse_decimal(value.trim()).ok_or_else(|| NormalizeError::InvalidValue {
                series_id: series_id.to_string(),
                date: date.to_string(),
                value: value.clone(),
            })?;

            batch.rows.push(Observation::new(
                series_id.clone(),
                observation_date,
                value,
                ingested_at,
                self.source_label.clone(),
            ));
        }

        Ok(batch)
    }
}

// Plain decimal first, scientific notation as a fallback for JSON numbers
fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
