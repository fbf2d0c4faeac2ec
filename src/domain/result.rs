//! Result type alias for fx-ingest

use super::errors::IngestError;

/// Result type alias for fx-ingest operations
///
/// # Examples
///
/// ```
/// use fx_ingest::domain::result::Result;
/// use fx_ingest::domain::errors::IngestError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(IngestError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IngestError>;
