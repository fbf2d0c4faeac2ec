// fx-ingest - Bank of Canada Valet FX observations to PostgreSQL
// Copyright (c) 2025 fx-ingest Contributors
// Licensed under the MIT License

//! # fx-ingest - Bank of Canada FX observations to PostgreSQL
//!
//! fx-ingest incrementally loads daily foreign-exchange observations from the
//! Bank of Canada Valet API into a durable raw table in PostgreSQL.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** the date range to load from the latest stored date per series
//! - **Fetching** observations for that range over HTTP
//! - **Normalizing** provider records into typed rows
//! - **Loading** rows through a staging table and a `MERGE` upsert
//!
//! Re-running a load for dates already stored changes nothing but the
//! ingestion timestamp; `(series_id, observation_date)` stays unique.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Watermark resolution, normalization, loading and orchestration
//! - [`adapters`] - External integrations (Valet API, PostgreSQL)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fx_ingest::config::load_config;
//! use fx_ingest::core::ingest::{IngestionRunner, RunParameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("fx-ingest.toml")?;
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//!     let runner = IngestionRunner::new(&config, shutdown)?;
//!     runner.prepare().await?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let summary = runner.run(&RunParameters::from_config(&config), today).await;
//!
//!     println!("Merged {} rows", summary.total_merged());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error is
//! [`domain::IngestError`]. A failing series does not abort the run; it is
//! recorded in the [`core::ingest::RunSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
