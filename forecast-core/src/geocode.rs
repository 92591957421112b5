//! Forward geocoding: turn a city name into coordinates.
//! The production backend is Nominatim (OpenStreetMap), which needs no API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{ForecastError, truncate_body},
    model::Location,
};

const SERVICE: &str = "geocoding service";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `Ok(None)` when the service knows no usable location for `city`.
    async fn geocode(&self, city: &str) -> Result<Option<Location>, ForecastError>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Option<String>,
    lon: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim).filter(|s| !s.is_empty())?.parse().ok()
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, city: &str) -> Result<Option<Location>, ForecastError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(%url, city, "Geocoding city");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(ForecastError::network(SERVICE))?;

        let status = res.status();
        let body = res.text().await.map_err(ForecastError::network(SERVICE))?;

        if !status.is_success() {
            return Err(ForecastError::UnexpectedStatus {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(ForecastError::parse(SERVICE))?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!(city, "Geocoder returned no results");
            return Ok(None);
        };

        let location = parse_coordinate(place.lat.as_deref())
            .zip(parse_coordinate(place.lon.as_deref()))
            .and_then(|(lat, lon)| Location::new(lat, lon));

        match &location {
            Some(loc) => tracing::info!(
                city,
                place = place.display_name.as_deref().unwrap_or(city),
                latitude = loc.latitude,
                longitude = loc.longitude,
                "Geocoded city"
            ),
            None => tracing::warn!(city, "Geocoder result has no usable coordinates"),
        }

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn geocoder_answering(body: serde_json::Value) -> (MockServer, NominatimGeocoder) {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Pittsburgh"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let geocoder = NominatimGeocoder::new(mock_server.uri(), Client::new());
        (mock_server, geocoder)
    }

    #[test]
    fn coordinates_must_be_non_empty_numbers() {
        assert_eq!(parse_coordinate(Some("40.44")), Some(40.44));
        assert_eq!(parse_coordinate(Some(" -79.99 ")), Some(-79.99));
        assert_eq!(parse_coordinate(Some("")), None);
        assert_eq!(parse_coordinate(Some("north")), None);
        assert_eq!(parse_coordinate(None), None);
    }

    #[tokio::test]
    async fn test_geocode_resolves_first_result() {
        let (_server, geocoder) = geocoder_answering(serde_json::json!([
            {"lat": "40.4416941", "lon": "-79.9900861", "display_name": "Pittsburgh, PA"},
            {"lat": "1.0", "lon": "1.0", "display_name": "Elsewhere"}
        ]))
        .await;

        let location = geocoder.geocode("Pittsburgh").await.unwrap().unwrap();
        assert_eq!(location.latitude, 40.4416941);
        assert_eq!(location.longitude, -79.9900861);
    }

    #[tokio::test]
    async fn test_geocode_empty_result_is_none() {
        let (_server, geocoder) = geocoder_answering(serde_json::json!([])).await;
        assert!(geocoder.geocode("Pittsburgh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_blank_coordinates_are_none() {
        let (_server, geocoder) =
            geocoder_answering(serde_json::json!([{"lat": "", "lon": "-79.99"}])).await;
        assert!(geocoder.geocode("Pittsburgh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_missing_coordinates_are_none() {
        let (_server, geocoder) =
            geocoder_answering(serde_json::json!([{"display_name": "Pittsburgh"}])).await;
        assert!(geocoder.geocode("Pittsburgh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_outage_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&mock_server)
            .await;

        let geocoder = NominatimGeocoder::new(mock_server.uri(), Client::new());
        let err = geocoder.geocode("Pittsburgh").await.unwrap_err();
        assert!(matches!(err, ForecastError::UnexpectedStatus { status: 503, .. }));
    }
}
