//! Tests of the warehouse SQL against a live PostgreSQL 15+ server
//!
//! Ignored by default. Run with a disposable database:
//!
//! ```text
//! FX_INGEST_TEST_DSN=postgresql://fx:fx@localhost:5432/fx cargo test --test warehouse_sql_test -- --ignored
//! ```
//!
//! Each run works in its own schema and drops it afterwards.

use chrono::{NaiveDate, Utc};
use fx_ingest::adapters::database::ObservationStore;
use fx_ingest::adapters::postgresql::{PostgresClient, PostgresWarehouse};
use fx_ingest::config::{parse_config, secret_string, WarehouseConfig};
use fx_ingest::domain::{IngestError, Observation, SeriesId, WarehouseError};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn usdcad() -> SeriesId {
    SeriesId::new("FXUSDCAD").unwrap()
}

fn row(d: &str, value: &str) -> Observation {
    Observation::new(
        usdcad(),
        date(d),
        Decimal::from_str(value).unwrap(),
        Utc::now(),
        "bank_of_canada_valet",
    )
}

fn warehouse_config(dsn: String) -> WarehouseConfig {
    let schema = format!("fx_ingest_test_{}", uuid::Uuid::new_v4().simple());
    let mut config = parse_config(&format!(
        r#"
[warehouse]
connection_string = "postgresql://localhost/placeholder"
schema = "{schema}"
"#
    ))
    .unwrap()
    .warehouse;
    config.connection_string = secret_string(dsn);
    config
}

async fn stored_values(client: &PostgresClient) -> Vec<(NaiveDate, String)> {
    let sql = format!(
        "SELECT observation_date, value::text FROM {} ORDER BY series_id, observation_date",
        client.config().raw_table_ref()
    );
    client
        .query(&sql, &[], WarehouseError::QueryFailed)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.get(0), r.get(1)))
        .collect()
}

async fn load(store: &PostgresWarehouse, rows: &[Observation]) -> u64 {
    store.truncate_stage().await.unwrap();
    let inserted = store.insert_stage(rows).await.unwrap();
    assert!(inserted.is_complete(rows.len()));
    store.merge_stage().await.unwrap()
}

#[tokio::test]
#[ignore = "needs FX_INGEST_TEST_DSN pointing at PostgreSQL 15+"]
async fn test_stage_and_merge_against_postgres() {
    let Ok(dsn) = std::env::var("FX_INGEST_TEST_DSN") else {
        return;
    };
    let config = warehouse_config(dsn);
    let drop_schema = format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", config.schema);
    let client = Arc::new(PostgresClient::new(config).unwrap());
    let store = PostgresWarehouse::new_with_arc(client.clone());

    store.test_connection().await.unwrap();

    // Before any DDL the raw table is reported missing, not as a query failure
    let missing = store.max_observation_date(&usdcad()).await.unwrap_err();
    assert!(matches!(
        missing,
        IngestError::Warehouse(WarehouseError::MissingTable(_))
    ));

    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
    assert_eq!(store.max_observation_date(&usdcad()).await.unwrap(), None);

    let merged = load(&store, &[row("2019-01-02", "1.3642"), row("2019-01-03", "1.3570")]).await;
    assert_eq!(merged, 2);
    assert_eq!(
        store.max_observation_date(&usdcad()).await.unwrap(),
        Some(date("2019-01-03"))
    );

    // Overlapping reload: one corrected value and one new date
    let overlap = [row("2019-01-03", "1.3575"), row("2019-01-04", "1.3449")];
    assert_eq!(load(&store, &overlap).await, 2);
    assert_eq!(load(&store, &overlap).await, 2);

    assert_eq!(
        stored_values(&client).await,
        vec![
            (date("2019-01-02"), "1.3642".to_string()),
            (date("2019-01-03"), "1.3575".to_string()),
            (date("2019-01-04"), "1.3449".to_string()),
        ]
    );

    client
        .batch(&[drop_schema.as_str()], WarehouseError::SchemaFailed)
        .await
        .unwrap();
}
