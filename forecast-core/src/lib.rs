//! Core library for the `nightly-forecast` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and the api.weather.gov client
//! - The "Tonight" forecast lookup
//! - The persisted history table and its markdown report
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod history;
pub mod model;
pub mod nws;
pub mod report;
pub mod updater;

pub use config::{Config, HttpConfig, ReportConfig};
pub use error::ForecastError;
pub use forecast::ForecastFetcher;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use history::{HistoryRecord, HistoryTable};
pub use model::{ForecastPeriod, Location};
pub use nws::NwsClient;
pub use updater::RunSummary;
