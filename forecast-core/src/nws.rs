//! Client for the US National Weather Service API (api.weather.gov).
//!
//! A forecast takes two requests:
//! - `/points/{lat},{lon}` returns `properties.forecast`, the URL of the
//!   gridpoint forecast for that location;
//! - that URL returns `properties.periods`, an ordered list of named periods.

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{ForecastError, truncate_body},
    model::{ForecastPeriod, Location},
};

const SERVICE: &str = "weather API";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    base_url: String,
    http: Client,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Resolve the forecast document URL for `location`.
    pub async fn forecast_url(&self, location: &Location) -> Result<String, ForecastError> {
        let url = format!("{}/points/{}", self.base_url, location.as_point());
        let points: PointsResponse = self.get_json(&url).await?;
        Ok(points.properties.forecast)
    }

    /// Fetch the ordered forecast periods from a forecast document URL.
    pub async fn periods(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let forecast: ForecastResponse = self.get_json(forecast_url).await?;
        tracing::debug!(count = forecast.properties.periods.len(), "Fetched forecast periods");
        Ok(forecast.properties.periods)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ForecastError> {
        tracing::debug!(%url, "Requesting weather API");

        let res = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(ForecastError::network(SERVICE))?;

        let status = res.status();
        let body = res.text().await.map_err(ForecastError::network(SERVICE))?;

        if !status.is_success() {
            return Err(ForecastError::ForecastUnavailable(format!(
                "{url} answered with status {status}: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body).map_err(ForecastError::parse(SERVICE))
    }
}
