//! SQL statements for the raw and staging tables
//!
//! Table names come from configuration and have already been checked against
//! the identifier pattern, so they are interpolated quoted. Row data is
//! always bound as a parameter.

use crate::config::WarehouseConfig;

const COLUMNS: &str = "series_id, observation_date, value, ingested_at, source";

/// Statements bound to one pair of raw/staging tables
#[derive(Debug, Clone)]
pub struct WarehouseStatements {
    pub create_schema: String,
    pub create_raw_table: String,
    pub create_stage_table: String,
    pub max_observation_date: String,
    pub truncate_stage: String,
    pub insert_stage: String,
    pub merge_stage: String,
}

impl WarehouseStatements {
    pub fn new(config: &WarehouseConfig) -> Self {
        let raw = config.raw_table_ref();
        let stage = config.stage_table_ref();

        Self {
            create_schema: format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", config.schema),
            create_raw_table: format!(
                "CREATE TABLE IF NOT EXISTS {raw} (
                    series_id TEXT NOT NULL,
                    observation_date DATE NOT NULL,
                    value NUMERIC NOT NULL,
                    ingested_at TIMESTAMPTZ NOT NULL,
                    source TEXT NOT NULL,
                    PRIMARY KEY (series_id, observation_date)
                )"
            ),
            create_stage_table: format!(
                "CREATE TABLE IF NOT EXISTS {stage} (
                    series_id TEXT NOT NULL,
                    observation_date DATE NOT NULL,
                    value NUMERIC NOT NULL,
                    ingested_at TIMESTAMPTZ NOT NULL,
                    source TEXT NOT NULL
                )"
            ),
            max_observation_date: format!(
                "SELECT MAX(observation_date) FROM {raw} WHERE series_id = $1"
            ),
            truncate_stage: format!("TRUNCATE TABLE {stage}"),
            insert_stage: format!(
                "INSERT INTO {stage} ({COLUMNS})
                 SELECT {COLUMNS}
                 FROM jsonb_to_recordset($1::jsonb) AS r(
                    series_id text,
                    observation_date date,
                    value numeric,
                    ingested_at timestamptz,
                    source text
                 )"
            ),
            merge_stage: format!(
                "MERGE INTO {raw} AS t
                 USING {stage} AS s
                 ON t.series_id = s.series_id AND t.observation_date = s.observation_date
                 WHEN MATCHED THEN
                    UPDATE SET value = s.value, ingested_at = s.ingested_at, source = s.source
                 WHEN NOT MATCHED THEN
                    INSERT ({COLUMNS})
                    VALUES (s.series_id, s.observation_date, s.value, s.ingested_at, s.source)"
            ),
        }
    }

    /// DDL in execution order
    pub fn schema_statements(&self) -> [&str; 3] {
        [
            &self.create_schema,
            &self.create_raw_table,
            &self.create_stage_table,
        ]
    }
}
