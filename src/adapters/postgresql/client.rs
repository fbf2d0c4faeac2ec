//! PostgreSQL client implementation
//!
//! This module provides the pooled client used by the warehouse adapter.

use crate::config::WarehouseConfig;
use crate::domain::{IngestError, Result, WarehouseError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use url::Url;

/// Maps a driver error message to the warehouse error for the failed step
pub type ErrorKind = fn(String) -> WarehouseError;

/// PostgreSQL client for fx-ingest
///
/// Holds a connection pool and applies the configured statement timeout on
/// every checkout.
pub struct PostgresClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: WarehouseConfig,
}

impl PostgresClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened here; the pool connects lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string cannot be
    /// parsed or the TLS connector cannot be built.
    pub fn new(config: WarehouseConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .parse()
            .map_err(|e| {
                IngestError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;
        pg_config.ssl_mode(parse_ssl_mode(&config.ssl_mode)?);

        let connector = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| IngestError::Configuration(format!("Failed to build TLS connector: {e}")))?;

        let manager = Manager::from_config(
            pg_config,
            MakeTlsConnector::new(connector),
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                IngestError::Configuration(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Warehouse configuration this client was built from
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(format!("Connection test failed: {e}")))?;

        tracing::info!(
            warehouse = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::ConnectionFailed`] if no connection can be
    /// obtained or the session cannot be configured.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            WarehouseError::ConnectionFailed(format!("Failed to get connection from pool: {e}"))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            WarehouseError::ConnectionFailed(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    ///
    /// # Errors
    ///
    /// A missing relation is reported as [`WarehouseError::MissingTable`];
    /// other driver failures go through `on_error`.
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
        on_error: ErrorKind,
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        client.query(query, params).await.map_err(|e| {
            if e.code() == Some(&SqlState::UNDEFINED_TABLE) {
                WarehouseError::MissingTable(describe_error(&e)).into()
            } else {
                on_error(describe_error(&e)).into()
            }
        })
    }

    /// Execute a statement and return the number of affected rows
    ///
    /// # Errors
    ///
    /// Driver failures are reported through `on_error`.
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
        on_error: ErrorKind,
    ) -> Result<u64> {
        let client = self.get_connection().await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| on_error(describe_error(&e)).into())
    }

    /// Run parameterless statements in order on one connection
    pub async fn batch(&self, statements: &[&str], on_error: ErrorKind) -> Result<()> {
        let client = self.get_connection().await?;

        for statement in statements {
            client
                .batch_execute(statement)
                .await
                .map_err(|e| on_error(describe_error(&e)))?;
        }

        Ok(())
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret())
    }
}

/// Map the configured `ssl_mode` onto the driver setting
pub fn parse_ssl_mode(mode: &str) -> Result<SslMode> {
    match mode {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(IngestError::Configuration(format!(
            "Unsupported ssl_mode '{other}'"
        ))),
    }
}

/// Mask credentials in a `postgresql://` URL
///
/// The user and password in the authority are replaced, and so is a
/// `password` query parameter. A string that does not parse as a URL is
/// masked entirely.
pub fn redact_connection_string(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "postgresql://***".to_string();
    };

    if url.has_host() {
        if !url.username().is_empty() {
            let _ = url.set_username("***");
        }
        let _ = url.set_password(None);
    }

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "password" {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

// Database errors carry the server message; everything else uses Display
fn describe_error(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => format!("{} ({})", db.message(), db.code().code()),
        None => err.to_string(),
    }
}
