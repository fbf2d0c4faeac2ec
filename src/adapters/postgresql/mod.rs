//! PostgreSQL warehouse integration
//!
//! This module provides the PostgreSQL implementation of the observation
//! store. `MERGE` is used for the upsert, so PostgreSQL 15 or later is
//! required.

pub mod adapter;
pub mod client;
pub mod models;
pub mod sql;

pub use adapter::PostgresWarehouse;
pub use client::PostgresClient;
pub use models::{stage_payload, PostgreSQLStageRow};
pub use sql::WarehouseStatements;
