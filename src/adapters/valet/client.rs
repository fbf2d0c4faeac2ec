//! Valet HTTP client
//!
//! Performs one `GET /observations/{series_id}` per call. Failures are
//! returned as [`ProviderError`] and never retried.

use super::models::ObservationsPayload;
use super::ObservationSource;
use crate::config::ProviderConfig;
use crate::domain::{IngestError, ProviderError, Result, SeriesId};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Bank of Canada Valet API client
///
/// # Example
///
/// ```no_run
/// use fx_ingest::adapters::valet::{ObservationSource, ValetClient};
/// use fx_ingest::config::ProviderConfig;
/// use fx_ingest::domain::SeriesId;
/// use chrono::NaiveDate;
///
/// # async fn example() -> fx_ingest::domain::Result<()> {
/// let client = ValetClient::new(&ProviderConfig::default())?;
/// let payload = client
///     .fetch(
///         &SeriesId::new("FXUSDCAD").unwrap(),
///         NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2019, 1, 31).unwrap(),
///     )
///     .await?;
/// println!("{} records", payload.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ValetClient {
    /// Base URL, e.g. `https://www.bankofcanada.ca/valet`
    base_url: Url,

    /// HTTP client for making requests
    client: Client,
}

impl ValetClient {
    /// Create a new Valet client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            IngestError::Configuration(format!(
                "Invalid provider.base_url '{}': {e}",
                config.base_url
            ))
        })?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("fx-ingest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IngestError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    /// Build the observations URL for a series and date range
    ///
    /// The series id is pushed as an encoded path segment.
    pub fn observations_url(
        &self,
        series_id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                IngestError::Configuration(format!(
                    "provider.base_url '{}' cannot be a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("observations")
            .push(series_id.as_str());

        url.query_pairs_mut()
            .append_pair("start_date", &start.format("%Y-%m-%d").to_string())
            .append_pair("end_date", &end.format("%Y-%m-%d").to_string());

        Ok(url)
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ObservationSource for ValetClient {
    async fn fetch(
        &self,
        series_id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationsPayload> {
        let url = self.observations_url(series_id, start, end)?;

        tracing::debug!(
            url = %url,
            series_id = %series_id,
            "Fetching observations"
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), body.trim()).into());
        }

        let body = resp.text().await.map_err(classify_transport_error)?;
        let payload: ObservationsPayload = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("{series_id}: {e}")))?;

        tracing::debug!(
            series_id = %series_id,
            records = payload.len(),
            "Observations received"
        );

        Ok(payload)
    }
}

fn classify_transport_error(err: reqwest::Error) -> IngestError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string()).into()
    } else {
        ProviderError::ConnectionFailed(err.to_string()).into()
    }
}
