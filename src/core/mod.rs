//! Core business logic for fx-ingest.
//!
//! This module contains the ingestion pipeline and its orchestration.
//!
//! # Modules
//!
//! - [`watermark`] - Range resolution from the latest stored date
//! - [`normalize`] - Provider payload to observation rows
//! - [`ingest`] - Stage-and-merge loading, run orchestration and reporting
//!
//! # Ingestion Workflow
//!
//! For each configured series, in order:
//!
//! 1. **Resolve**: Read `MAX(observation_date)` and compute the date range
//! 2. **Fetch**: Request that range from the Valet API
//! 3. **Normalize**: Convert records to typed rows, dropping or rejecting
//!    incomplete ones
//! 4. **Stage**: Truncate the staging table and insert the rows
//! 5. **Merge**: Upsert the staging table into the raw table
//!
//! An empty fetch stops after step 3 with no warehouse writes.
//!
//! # Example
//!
//! ```rust,no_run
//! use fx_ingest::config::load_config;
//! use fx_ingest::core::ingest::{IngestionRunner, RunParameters};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fx-ingest.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let runner = IngestionRunner::new(&config, shutdown_rx)?;
//! runner.prepare().await?;
//!
//! let today = chrono::Local::now().date_naive();
//! let summary = runner.run(&RunParameters::from_config(&config), today).await;
//!
//! println!("Merged: {}", summary.total_merged());
//! println!("Failed: {}", summary.failures.len());
//! # Ok(())
//! # }
//! ```

pub mod ingest;
pub mod normalize;
pub mod watermark;
