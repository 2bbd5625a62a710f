//! Fetches hourly observations from the weather API and writes them to the store.

pub mod client;
pub mod error;
pub mod normalize;
pub mod response;

use crate::ingest::client::WeatherApiClient;
use crate::ingest::error::IngestError;
use crate::ingest::normalize::normalize_hourly;
use crate::ingest::response::ForecastResponse;
use crate::settings::UpstreamSettings;
use crate::store::ObservationStore;
use crate::types::observation::LatLon;
use chrono::{Days, NaiveDate, Utc};
use log::{info, warn};
use serde::Serialize;

/// Calendar dates (inclusive) requested from the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// JSON summary returned by `/weather-report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub status: &'static str,
    pub message: &'static str,
    pub rows_stored: usize,
    pub range: DateRange,
    pub lat: f64,
    pub lon: f64,
}

pub struct Ingestor {
    client: WeatherApiClient,
    store: ObservationStore,
    lookback_days: u64,
}

impl Ingestor {
    pub fn new(client: WeatherApiClient, store: ObservationStore, lookback_days: u64) -> Self {
        Self {
            client,
            store,
            lookback_days,
        }
    }

    pub fn from_settings(
        settings: &UpstreamSettings,
        store: ObservationStore,
        lookback_days: u64,
    ) -> Result<Self, IngestError> {
        let client = WeatherApiClient::new(settings.api_url.clone(), settings.timeout())?;
        Ok(Self::new(client, store, lookback_days))
    }

    pub fn client(&self) -> &WeatherApiClient {
        &self.client
    }

    /// Normalizes the whole payload, then upserts it in one batch.
    ///
    /// A malformed entry aborts before anything is written.
    pub async fn normalize_and_store(
        &self,
        response: &ForecastResponse,
        location: LatLon,
    ) -> Result<usize, IngestError> {
        let rows = normalize_hourly(&response.hourly).inspect_err(|e| {
            warn!(
                "Rejecting weather payload for lat={}, lon={}: {}",
                location.lat(),
                location.lon(),
                e
            )
        })?;
        let stored = self.store.upsert_async(rows, location).await?;
        info!(
            "Stored {} observations for lat={}, lon={}",
            stored,
            location.lat(),
            location.lon()
        );
        Ok(stored)
    }

    /// Fetches the last `lookback_days` days up to today (UTC) and stores them.
    pub async fn run_report(&self, location: LatLon) -> Result<ReportSummary, IngestError> {
        self.run_report_for(location, Utc::now().date_naive()).await
    }

    /// [`Self::run_report`] with an explicit "today".
    pub async fn run_report_for(
        &self,
        location: LatLon,
        today: NaiveDate,
    ) -> Result<ReportSummary, IngestError> {
        let range = DateRange {
            start_date: today
                .checked_sub_days(Days::new(self.lookback_days))
                .unwrap_or(NaiveDate::MIN),
            end_date: today,
        };

        let response = self
            .client
            .fetch_range()
            .location(location)
            .start_date(range.start_date)
            .end_date(range.end_date)
            .call()
            .await?;
        let rows_stored = self.normalize_and_store(&response, location).await?;

        Ok(ReportSummary {
            status: "success",
            message: "Fetched and stored weather data",
            rows_stored,
            range,
            lat: location.lat(),
            lon: location.lon(),
        })
    }
}
