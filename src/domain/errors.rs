//! Domain error types
//!
//! This module defines the error hierarchy for fx-ingest. Errors coming from
//! third-party clients (reqwest, tokio-postgres) are converted into these
//! types at the adapter boundary and never leak past it.

use thiserror::Error;

/// Main fx-ingest error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Observation provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Warehouse errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Payload normalization errors
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl IngestError {
    /// Whether this error means a remote system could not be reached at all
    ///
    /// Used by the CLI to pick the connection-error exit code.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            IngestError::Provider(ProviderError::ConnectionFailed(_))
                | IngestError::Provider(ProviderError::Timeout(_))
                | IngestError::Warehouse(WarehouseError::ConnectionFailed(_))
        )
    }
}

/// Errors raised while calling the observation provider
///
/// Every variant is fatal for the series being fetched; nothing here is retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to connect to the provider
    #[error("Failed to connect to provider: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Body could not be decoded as an observations payload
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Build the matching variant for a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            ProviderError::ServerError { status, message }
        } else {
            ProviderError::ClientError { status, message }
        }
    }
}

/// Errors raised by the warehouse (durable raw table and staging table)
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Failed to connect or obtain a pooled connection
    #[error("Failed to connect to warehouse: {0}")]
    ConnectionFailed(String),

    /// A read query failed (watermark lookup, health check)
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A queried table does not exist yet
    #[error("Table does not exist: {0}")]
    MissingTable(String),

    /// Truncating the staging table failed
    #[error("Failed to truncate staging table: {0}")]
    TruncateFailed(String),

    /// Staging insert failed as a whole
    #[error("Failed to insert into staging table: {0}")]
    InsertFailed(String),

    /// The store reported row-level failures, or fewer rows than sent
    #[error("Partial staging insert: {inserted}/{expected} rows inserted ({} row errors)", failures.len())]
    PartialInsert {
        inserted: usize,
        expected: usize,
        failures: Vec<String>,
    },

    /// The merge statement failed
    #[error("Merge into raw table failed: {0}")]
    MergeFailed(String),

    /// Creating the schema or tables failed
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),
}

/// Errors raised while turning a provider payload into observation rows
///
/// Missing fields only surface here under the `reject` policy; with
/// `skip-on-missing` such records are dropped instead.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A record is missing its date or value
    #[error("Record {index} for {series_id} is missing {field}")]
    MissingField {
        series_id: String,
        index: usize,
        field: &'static str,
    },

    /// Date string is not `YYYY-MM-DD`
    #[error("Invalid observation date '{value}' for {series_id}")]
    InvalidDate { series_id: String, value: String },

    /// Value is present but not a decimal number
    #[error("Invalid observation value '{value}' for {series_id} on {date}")]
    InvalidValue {
        series_id: String,
        date: String,
        value: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for IngestError {
    fn from(err: toml::de::Error) -> Self {
        IngestError::Configuration(format!("TOML parse error: {err}"))
    }
}
