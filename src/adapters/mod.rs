//! External system integrations for fx-ingest.
//!
//! This module provides adapters for the two remote systems a run talks to:
//!
//! - [`valet`] - Bank of Canada Valet API (observation source)
//! - [`database`] - Warehouse abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL implementation of the warehouse
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The pipeline only sees the
//! [`valet::ObservationSource`] and [`database::ObservationStore`] traits.
//!
//! # Valet Adapter
//!
//! ```rust,no_run
//! use fx_ingest::adapters::valet::ValetClient;
//! use fx_ingest::config::ProviderConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ValetClient::new(&ProviderConfig::default())?;
//! println!("Fetching from {}", client.base_url());
//! # Ok(())
//! # }
//! ```
//!
//! # PostgreSQL Adapter
//!
//! ```rust,no_run
//! use fx_ingest::adapters::database::ObservationStore;
//! use fx_ingest::adapters::postgresql::PostgresWarehouse;
//! use fx_ingest::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fx-ingest.toml")?;
//! let warehouse = PostgresWarehouse::connect(&config.warehouse)?;
//! warehouse.ensure_schema().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod valet;
