//! Valet API payload models
//!
//! Only the parts of the observations response that the normalizer reads are
//! modelled. Other top-level keys (`terms`, `seriesDetail`) are ignored.

use crate::domain::SeriesId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /observations/{series_id}`
///
/// ```
/// use fx_ingest::adapters::valet::ObservationsPayload;
/// use fx_ingest::domain::SeriesId;
///
/// let payload: ObservationsPayload = serde_json::from_str(
///     r#"{"observations":[{"d":"2019-01-02","FXUSDCAD":{"v":"1.3580"}}]}"#,
/// ).unwrap();
///
/// let series = SeriesId::new("FXUSDCAD").unwrap();
/// assert_eq!(payload.observations[0].date(), Some("2019-01-02"));
/// assert_eq!(payload.observations[0].value_for(&series).as_deref(), Some("1.3580"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationsPayload {
    /// One entry per published date
    #[serde(default)]
    pub observations: Vec<RawObservation>,
}

impl ObservationsPayload {
    /// Number of raw records, before any filtering
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the provider returned no records at all
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// One raw record: `{"d": "YYYY-MM-DD", "<series_id>": {"v": "<number>"}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Observation date as sent by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// Per-series value objects keyed by series id
    #[serde(flatten)]
    pub series: Map<String, Value>,
}

impl RawObservation {
    /// Build a record holding one series value
    pub fn new(date: impl Into<String>, series_id: &SeriesId, value: impl Into<String>) -> Self {
        let mut series = Map::new();
        series.insert(
            series_id.to_string(),
            serde_json::json!({ "v": value.into() }),
        );
        Self {
            d: Some(date.into()),
            series,
        }
    }

    /// The date string, if present
    pub fn date(&self) -> Option<&str> {
        self.d.as_deref()
    }

    /// The raw `v` for `series_id` as text
    ///
    /// Returns `None` when the series object or its `v` is absent or null.
    /// Numbers are rendered with their JSON text so no precision is lost.
    pub fn value_for(&self, series_id: &SeriesId) -> Option<String> {
        match self.series.get(series_id.as_str())?.get("v")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdcad() -> SeriesId {
        SeriesId::new("FXUSDCAD").unwrap()
    }

    #[test]
    fn test_payload_ignores_extra_keys() {
        let payload: ObservationsPayload = serde_json::from_str(
            r#"{
                "terms": {"url": "https://www.bankofcanada.ca/terms/"},
                "seriesDetail": {"FXUSDCAD": {"label": "USD/CAD"}},
                "observations": [
                    {"d": "2019-01-02", "FXUSDCAD": {"v": "1.3580"}},
                    {"d": "2019-01-03", "FXUSDCAD": {"v": "1.3550"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_payload_without_observations() {
        let payload: ObservationsPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_value_for_handles_numbers_and_nulls() {
        let record: RawObservation = serde_json::from_str(
            r#"{"d": "2019-01-02", "FXUSDCAD": {"v": 1.358}, "FXEURCAD": {"v": null}}"#,
        )
        .unwrap();
        assert_eq!(record.value_for(&usdcad()).as_deref(), Some("1.358"));
        assert_eq!(
            record.value_for(&SeriesId::new("FXEURCAD").unwrap()),
            None
        );
        assert_eq!(record.value_for(&SeriesId::new("FXGBPCAD").unwrap()), None);
    }

    #[test]
    fn test_new_round_trips_through_json() {
        let record = RawObservation::new("2019-01-01", &usdcad(), "1.30");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["d"], "2019-01-01");
        assert_eq!(json["FXUSDCAD"]["v"], "1.30");
    }
}
