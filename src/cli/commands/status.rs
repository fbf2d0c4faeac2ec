//! Status command implementation
//!
//! This module implements the `status` command for displaying the stored
//! watermark of each series and where the next incremental load would start.

use crate::adapters::database::create_observation_store;
use crate::config::load_config;
use crate::core::watermark::{resolve_range, WatermarkResolver};
use crate::domain::{IngestionMode, SeriesId};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Series to report on (defaults to the configured list)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub series: Vec<SeriesId>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking ingestion status");

        println!("📊 Ingestion Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2); // Configuration error exit code
            }
        };

        let store = match create_observation_store(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create warehouse client");
                println!("   Error: {}", e);
                return Ok(2);
            }
        };

        if let Err(e) = store.test_connection().await {
            println!("❌ Failed to connect to warehouse");
            println!("   Error: {}", e);
            return Ok(4); // Connection error exit code
        }

        let series = if self.series.is_empty() {
            config.ingestion.series.clone()
        } else {
            self.series.clone()
        };

        let backfill_start = config.ingestion.backfill_start;
        let resolver = WatermarkResolver::new(store.clone(), backfill_start);
        let today = chrono::Local::now().date_naive();

        println!("Warehouse: {}", store.describe());
        println!();
        println!("{:<14} {:<14} {:<14}", "Series", "Watermark", "Next Start");
        println!("{}", "-".repeat(44));

        for series_id in &series {
            let watermark = match resolver.watermark(series_id).await {
                Ok(w) => w,
                Err(e) => {
                    println!("❌ Failed to read watermark for {series_id}");
                    println!("   Error: {}", e);
                    return Ok(5); // Fatal error exit code
                }
            };

            let (next_start, _) = resolve_range(
                IngestionMode::Incremental,
                watermark,
                None,
                None,
                backfill_start,
                today,
            );

            let shown = watermark
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Never".to_string());

            println!(
                "{:<14} {:<14} {:<14}",
                series_id.as_str(),
                shown,
                next_start
            );
        }

        println!();
        Ok(0)
    }
}
