//! Warehouse client factory
//!
//! This module provides the factory function that builds the observation
//! store from configuration.

use crate::adapters::database::traits::ObservationStore;
use crate::adapters::postgresql::adapter::PostgresWarehouse;
use crate::adapters::postgresql::client::PostgresClient;
use crate::config::schema::IngestConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the observation store for the configured warehouse
///
/// # Arguments
///
/// * `config` - The fx-ingest configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements ObservationStore
///
/// # Errors
///
/// Returns an error if the warehouse client cannot be created
pub fn create_observation_store(
    config: &IngestConfig,
) -> Result<Arc<dyn ObservationStore + Send + Sync>> {
    tracing::info!("Creating PostgreSQL warehouse client");
    let client = Arc::new(PostgresClient::new(config.warehouse.clone())?);
    let adapter = PostgresWarehouse::new_with_arc(client);

    Ok(Arc::new(adapter) as Arc<dyn ObservationStore + Send + Sync>)
}
