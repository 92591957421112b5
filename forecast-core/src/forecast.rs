use reqwest::Client;
use std::time::Duration;

use crate::{
    config::HttpConfig,
    error::ForecastError,
    geocode::{Geocoder, NominatimGeocoder},
    model::{ForecastPeriod, TONIGHT},
    nws::NwsClient,
};

/// Resolves a city to tonight's forecast period.
#[derive(Debug)]
pub struct ForecastFetcher {
    geocoder: Box<dyn Geocoder>,
    nws: NwsClient,
}

impl ForecastFetcher {
    pub fn new(geocoder: Box<dyn Geocoder>, nws: NwsClient) -> Self {
        Self { geocoder, nws }
    }

    /// Construct the production fetcher (Nominatim + api.weather.gov) from config.
    pub fn from_config(config: &HttpConfig) -> Result<Self, ForecastError> {
        let http = http_client(config)?;
        let geocoder = NominatimGeocoder::new(config.geocoder_url.clone(), http.clone());
        let nws = NwsClient::new(config.weather_api_url.clone(), http);
        Ok(Self::new(Box::new(geocoder), nws))
    }

    /// Tonight's forecast for `city`.
    pub async fn get_forecast(&self, city: &str) -> Result<ForecastPeriod, ForecastError> {
        let location = self
            .geocoder
            .geocode(city)
            .await?
            .ok_or_else(|| ForecastError::CityNotFound(city.to_string()))?;

        let forecast_url = self.nws.forecast_url(&location).await?;
        let periods = self.nws.periods(&forecast_url).await?;

        let tonight = find_tonight(periods).ok_or_else(|| {
            ForecastError::ForecastUnavailable(format!("no period named '{TONIGHT}' for {city}"))
        })?;

        tracing::info!(
            city,
            start = %tonight.start_time,
            end = %tonight.end_time,
            "Fetched tonight's forecast"
        );
        Ok(tonight)
    }
}

/// First period named exactly "Tonight", in document order.
pub fn find_tonight(periods: Vec<ForecastPeriod>) -> Option<ForecastPeriod> {
    periods.into_iter().find(ForecastPeriod::is_tonight)
}

fn http_client(config: &HttpConfig) -> Result<Client, ForecastError> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(ForecastError::network("HTTP client"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug)]
    struct FixedGeocoder(Option<Location>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _city: &str) -> Result<Option<Location>, ForecastError> {
            Ok(self.0)
        }
    }

    fn period(name: &str) -> ForecastPeriod {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "startTime": "T0",
            "endTime": "T1",
            "detailedForecast": format!("{name} forecast")
        }))
        .expect("valid period")
    }

    async fn weather_api_with_periods(periods: serde_json::Value) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/40.4406,-79.9959"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": {"forecast": format!("{}/gridpoints/PBZ/77,65/forecast", mock_server.uri())}
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/PBZ/77,65/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"properties": {"periods": periods}})),
            )
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn fetcher(server: &MockServer, location: Option<Location>) -> ForecastFetcher {
        ForecastFetcher::new(
            Box::new(FixedGeocoder(location)),
            NwsClient::new(server.uri(), Client::new()),
        )
    }

    fn downtown() -> Option<Location> {
        Location::new(40.4406, -79.9959)
    }

    #[test]
    fn find_tonight_is_exact_and_first() {
        let mut second = period("Tonight");
        second.detailed_forecast = "second".into();

        let found = find_tonight(vec![period("tonight"), period("Tonight"), second]);
        assert_eq!(found.map(|p| p.detailed_forecast), Some("Tonight forecast".to_string()));

        assert!(find_tonight(vec![period("Tonight Late"), period("Monday Night")]).is_none());
        assert!(find_tonight(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_returns_tonight_period_verbatim() {
        let tonight = serde_json::json!({
            "name": "Tonight",
            "startTime": "T0",
            "endTime": "T1",
            "detailedForecast": "Clear"
        });
        let server = weather_api_with_periods(serde_json::json!([
            {"name": "This Afternoon", "startTime": "T-1", "endTime": "T0", "detailedForecast": "Sunny"},
            tonight.clone()
        ]))
        .await;

        let period = fetcher(&server, downtown()).get_forecast("Pittsburgh").await.unwrap();
        assert_eq!(serde_json::to_value(&period).unwrap(), tonight);
    }

    #[tokio::test]
    async fn test_missing_tonight_is_unavailable() {
        let server = weather_api_with_periods(serde_json::json!([
            {"name": "Overnight", "startTime": "T0", "endTime": "T1", "detailedForecast": "Clear"}
        ]))
        .await;

        let err = fetcher(&server, downtown()).get_forecast("Pittsburgh").await.unwrap_err();
        assert!(matches!(err, ForecastError::ForecastUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let server = MockServer::start().await;

        let err = fetcher(&server, None).get_forecast("Atlantis").await.unwrap_err();
        match err {
            ForecastError::CityNotFound(city) => assert_eq!(city, "Atlantis"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[test]
    fn from_config_builds_with_defaults() {
        assert!(ForecastFetcher::from_config(&HttpConfig::default()).is_ok());
    }
}
