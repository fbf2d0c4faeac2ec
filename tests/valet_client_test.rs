//! Integration tests for the Valet HTTP client against a mock server

use chrono::NaiveDate;
use fx_ingest::adapters::valet::{ObservationSource, ValetClient};
use fx_ingest::config::ProviderConfig;
use fx_ingest::domain::{IngestError, ProviderError, SeriesId};
use mockito::Matcher;

fn client(base_url: String) -> ValetClient {
    ValetClient::new(&ProviderConfig {
        base_url,
        timeout_seconds: 5,
        ..ProviderConfig::default()
    })
    .unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn usdcad() -> SeriesId {
    SeriesId::new("FXUSDCAD").unwrap()
}

fn range_query(start: &str, end: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("start_date".into(), start.into()),
        Matcher::UrlEncoded("end_date".into(), end.into()),
    ])
}

#[tokio::test]
async fn test_fetch_parses_observations() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/valet/observations/FXUSDCAD")
        .match_query(range_query("2019-01-01", "2019-01-03"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "terms": {"url": "https://www.bankofcanada.ca/terms/"},
                "seriesDetail": {"FXUSDCAD": {"label": "USD/CAD"}},
                "observations": [
                    {"d": "2019-01-01", "FXUSDCAD": {"v": "1.30"}},
                    {"d": "2019-01-02"},
                    {"d": "2019-01-03", "FXUSDCAD": {"v": "1.32"}}
                ]
            }"#,
        )
        .create_async()
        .await;

    let payload = client(format!("{}/valet", server.url()))
        .fetch(&usdcad(), date("2019-01-01"), date("2019-01-03"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(payload.len(), 3);
    assert_eq!(payload.observations[0].date(), Some("2019-01-01"));
    assert_eq!(
        payload.observations[0].value_for(&usdcad()).as_deref(),
        Some("1.30")
    );
    assert_eq!(payload.observations[1].value_for(&usdcad()), None);
}

#[tokio::test]
async fn test_fetch_without_observations_key_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/observations/FXUSDCAD")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"terms": {}}"#)
        .create_async()
        .await;

    let payload = client(server.url())
        .fetch(&usdcad(), date("2024-06-02"), date("2024-06-10"))
        .await
        .unwrap();

    assert!(payload.is_empty());
}

#[tokio::test]
async fn test_fetch_client_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/observations/FXUSDCAD")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Series FXUSDCAD not found."}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .fetch(&usdcad(), date("2024-06-02"), date("2024-06-10"))
        .await
        .unwrap_err();

    match err {
        IngestError::Provider(ProviderError::ClientError { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_server_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/observations/FXUSDCAD")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let err = client(server.url())
        .fetch(&usdcad(), date("2024-06-02"), date("2024-06-10"))
        .await
        .unwrap_err();

    // One request only; nothing is retried
    mock.assert_async().await;
    assert!(matches!(
        err,
        IngestError::Provider(ProviderError::ServerError { status: 500, .. })
    ));
    assert!(!err.is_connection_error());
}

#[tokio::test]
async fn test_fetch_invalid_json() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/observations/FXUSDCAD")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(server.url())
        .fetch(&usdcad(), date("2024-06-02"), date("2024-06-10"))
        .await
        .unwrap_err();

    match err {
        IngestError::Provider(ProviderError::InvalidResponse(message)) => {
            assert!(message.starts_with("FXUSDCAD"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_passes_inverted_range_through() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/observations/FXUSDCAD")
        .match_query(range_query("2024-06-11", "2024-06-10"))
        .with_status(400)
        .with_body("start_date must be before end_date")
        .create_async()
        .await;

    let err = client(server.url())
        .fetch(&usdcad(), date("2024-06-11"), date("2024-06-10"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        IngestError::Provider(ProviderError::ClientError { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let err = client("http://127.0.0.1:1".to_string())
        .fetch(&usdcad(), date("2024-06-02"), date("2024-06-10"))
        .await
        .unwrap_err();

    assert!(err.is_connection_error());
}
