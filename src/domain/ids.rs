//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Series identifier newtype wrapper
///
/// Identifies one provider time series, e.g. `FXUSDCAD`. The id is placed
/// in a URL path segment and used as a JSON key, so only ASCII letters,
/// digits, `_`, `.` and `-` are accepted.
///
/// # Examples
///
/// ```
/// use fx_ingest::domain::ids::SeriesId;
/// use std::str::FromStr;
///
/// let series_id = SeriesId::from_str("FXUSDCAD").unwrap();
/// assert_eq!(series_id.as_str(), "FXUSDCAD");
/// assert!(SeriesId::new("FX/USD").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesId(String);

impl SeriesId {
    /// Creates a new SeriesId from a string
    ///
    /// Surrounding whitespace is trimmed.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err("Series ID cannot be empty".to_string());
        }

        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        {
            return Err(format!(
                "Invalid character '{c}' in series ID '{id}'. Allowed: A-Z, a-z, 0-9, '_', '.', '-'"
            ));
        }

        Ok(Self(id))
    }

    /// Returns the series ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeriesId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SeriesId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeriesId> for String {
    fn from(id: SeriesId) -> Self {
        id.0
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
