//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the fx-ingest configuration file.

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates; a second pass only reports the summary
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                let series: Vec<&str> = config
                    .ingestion
                    .series
                    .iter()
                    .map(|s| s.as_str())
                    .collect();

                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Dry Run: {}", config.application.dry_run);
                println!("  Provider: {}", config.provider.base_url);
                println!("  Provider Timeout: {}s", config.provider.timeout_seconds);
                println!(
                    "  Warehouse: {}",
                    redact_connection_string(config.warehouse.connection_string.expose_secret())
                );
                println!("  Raw Table: {}", config.warehouse.raw_table_ref());
                println!("  Stage Table: {}", config.warehouse.stage_table_ref());
                println!("  SSL Mode: {}", config.warehouse.ssl_mode);
                println!("  Series: {}", series.join(", "));
                println!("  Mode: {}", config.ingestion.mode);
                println!("  Backfill Start: {}", config.ingestion.backfill_start);
                println!(
                    "  Malformed Records: {:?}",
                    config.ingestion.malformed_records
                );
                println!("  Halt On Error: {}", config.ingestion.halt_on_error);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_good_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[warehouse]
connection_string = "postgresql://fx:fx@localhost:5432/warehouse"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_bad_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[warehouse]
connection_string = "mysql://localhost/warehouse"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
