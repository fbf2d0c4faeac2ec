//! Configuration management for fx-ingest.
//!
//! fx-ingest reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FX_INGEST_<SECTION>_<KEY>` environment overrides
//! - Default values for everything except the warehouse connection string
//! - Validation on load
//!
//! The resulting [`IngestConfig`] is passed explicitly into the runner and
//! the adapter constructors; nothing reads configuration from globals.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [provider]
//! base_url = "https://www.bankofcanada.ca/valet"
//! timeout_seconds = 30
//!
//! [ingestion]
//! series = ["FXUSDCAD", "FXEURCAD", "FXGBPCAD"]
//! mode = "incremental"
//! backfill_start = "2019-01-01"
//! malformed_records = "skip-on-missing"
//!
//! [warehouse]
//! connection_string = "${FX_WAREHOUSE_URL}"
//! schema = "raw"
//! raw_table = "boc_fx_observations"
//! stage_table = "_fx_observations_stage"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fx_ingest::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fx-ingest.toml")?;
//! println!("Series: {:?}", config.ingestion.series);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, IngestConfig, IngestionConfig, LoggingConfig, ProviderConfig,
    WarehouseConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
