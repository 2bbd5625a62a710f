use crate::ingest::error::IngestError;
use crate::ingest::response::ForecastResponse;
use crate::types::observation::LatLon;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

const HOURLY_VARIABLES: &str = "temperature_2m,relative_humidity_2m";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Thin client for the weather API's hourly forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_url: String,
    http: Client,
}

#[bon]
impl WeatherApiClient {
    /// Builds a client for `api_url` whose requests give up after `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, IngestError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IngestError::ClientBuild)?;
        Ok(Self {
            api_url: api_url.into(),
            http,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches hourly temperature and humidity for `location` between two
    /// calendar dates (inclusive), in UTC.
    ///
    /// Issues exactly one GET; a network failure or non-2xx status is returned
    /// as an error carrying the upstream detail. There is no retry.
    ///
    /// ```no_run
    /// # use weather_report::{LatLon, WeatherApiClient, IngestError};
    /// # use chrono::NaiveDate;
    /// # use std::time::Duration;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), IngestError> {
    /// let client = WeatherApiClient::new("https://api.open-meteo.com/v1/forecast", Duration::from_secs(20))?;
    /// let response = client
    ///     .fetch_range()
    ///     .location(LatLon(47.37, 8.55))
    ///     .start_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    ///     .end_date(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} hourly entries", response.hourly.time.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_range(
        &self,
        location: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ForecastResponse, IngestError> {
        let url = self.api_url.clone();
        info!(
            "Fetching hourly weather for lat={}, lon={} from {} to {}",
            location.lat(),
            location.lon(),
            start_date,
            end_date
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.lat().to_string()),
                ("longitude", location.lon().to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("start_date", start_date.format(DATE_FORMAT).to_string()),
                ("end_date", end_date.format(DATE_FORMAT).to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("Weather API unreachable at {}: {}", url, e);
                IngestError::NetworkRequest(url.clone(), e)
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    IngestError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    IngestError::NetworkRequest(url, e)
                });
            }
        };

        response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| IngestError::InvalidBody(url, e))
    }
}
