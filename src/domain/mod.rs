//! Domain models and types for fx-ingest.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SeriesId`])
//! - **The canonical row** ([`Observation`]) and [`IngestionMode`]
//! - **Error types** ([`IngestError`], [`ProviderError`], [`WarehouseError`], [`NormalizeError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T>`]:
//!
//! ```rust
//! use fx_ingest::domain::{IngestError, Result, SeriesId};
//!
//! fn parse(raw: &str) -> Result<SeriesId> {
//!     SeriesId::new(raw).map_err(IngestError::Validation)
//! }
//!
//! assert!(parse("FXUSDCAD").is_ok());
//! assert!(parse("").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod observation;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{IngestError, NormalizeError, ProviderError, WarehouseError};
pub use ids::SeriesId;
pub use observation::{IngestionMode, Observation};
pub use result::Result;
