//! PostgreSQL adapter implementing the observation store
//!
//! This module provides the [`ObservationStore`] implementation backed by
//! [`PostgresClient`].

use crate::adapters::database::traits::{ObservationStore, StageInsertResult};
use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::postgresql::models::stage_payload;
use crate::adapters::postgresql::sql::WarehouseStatements;
use crate::config::WarehouseConfig;
use crate::domain::{Observation, Result, SeriesId, WarehouseError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// PostgreSQL warehouse holding the raw and staging tables
pub struct PostgresWarehouse {
    client: Arc<PostgresClient>,
    statements: WarehouseStatements,
}

impl PostgresWarehouse {
    /// Create a new warehouse adapter
    pub fn new(client: PostgresClient) -> Self {
        Self::new_with_arc(Arc::new(client))
    }

    /// Create a new warehouse adapter with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgresClient>) -> Self {
        let statements = WarehouseStatements::new(client.config());
        Self { client, statements }
    }

    /// Build the client and adapter from configuration
    pub fn connect(config: &WarehouseConfig) -> Result<Self> {
        Ok(Self::new(PostgresClient::new(config.clone())?))
    }
}

#[async_trait]
impl ObservationStore for PostgresWarehouse {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client
            .batch(
                &self.statements.schema_statements(),
                WarehouseError::SchemaFailed,
            )
            .await?;

        tracing::info!(
            raw_table = %self.client.config().raw_table_ref(),
            stage_table = %self.client.config().stage_table_ref(),
            "Warehouse schema ready"
        );
        Ok(())
    }

    async fn max_observation_date(&self, series_id: &SeriesId) -> Result<Option<NaiveDate>> {
        let rows = self
            .client
            .query(
                &self.statements.max_observation_date,
                &[&series_id.as_str()],
                WarehouseError::QueryFailed,
            )
            .await?;

        let watermark = match rows.first() {
            Some(row) => row
                .try_get::<_, Option<NaiveDate>>(0)
                .map_err(|e| WarehouseError::QueryFailed(format!("Unexpected MAX result: {e}")))?,
            None => None,
        };

        tracing::debug!(
            series_id = %series_id,
            watermark = ?watermark,
            "Loaded watermark from PostgreSQL"
        );

        Ok(watermark)
    }

    async fn truncate_stage(&self) -> Result<()> {
        self.client
            .execute(
                &self.statements.truncate_stage,
                &[],
                WarehouseError::TruncateFailed,
            )
            .await?;
        Ok(())
    }

    async fn insert_stage(&self, rows: &[Observation]) -> Result<StageInsertResult> {
        let payload = stage_payload(rows)?;

        let inserted = self
            .client
            .execute(
                &self.statements.insert_stage,
                &[&payload],
                WarehouseError::InsertFailed,
            )
            .await?;

        tracing::debug!(
            rows = rows.len(),
            inserted,
            "Staging insert executed"
        );

        Ok(StageInsertResult::complete(inserted as usize))
    }

    async fn merge_stage(&self) -> Result<u64> {
        self.client
            .execute(&self.statements.merge_stage, &[], WarehouseError::MergeFailed)
            .await
    }

    fn describe(&self) -> String {
        format!(
            "{} {}",
            self.client.connection_string_safe(),
            self.client.config().raw_table_ref()
        )
    }
}
