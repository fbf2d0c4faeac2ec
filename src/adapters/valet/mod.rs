//! Bank of Canada Valet API integration
//!
//! [`ObservationSource`] is the seam the runner fetches through;
//! [`ValetClient`] is the HTTP implementation.

pub mod client;
pub mod models;

pub use client::ValetClient;
pub use models::{ObservationsPayload, RawObservation};

use crate::domain::{Result, SeriesId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of raw observations for one series and date range
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fetch observations for `series_id` between `start` and `end` inclusive
    ///
    /// An inverted range is passed through unchanged; what comes back is up
    /// to the provider.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ProviderError`] on transport failures,
    /// non-success statuses and undecodable bodies.
    async fn fetch(
        &self,
        series_id: &SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationsPayload>;
}
