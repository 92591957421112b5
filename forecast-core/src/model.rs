use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the only forecast period this crate keeps.
pub const TONIGHT: &str = "Tonight";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Both coordinates must be present and non-zero.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        (usable(latitude) && usable(longitude)).then_some(Self { latitude, longitude })
    }

    /// `lat,lon` with four decimals, the precision api.weather.gov accepts without a redirect.
    pub fn as_point(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// One entry of `properties.periods` in a weather.gov forecast document.
///
/// Only the fields this crate reads are typed; everything else the API sends
/// is kept in `extra` so the period can be handed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub detailed_forecast: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForecastPeriod {
    pub fn is_tonight(&self) -> bool {
        self.name == TONIGHT
    }

    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.start_time).ok()
    }

    pub fn ends_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.end_time).ok()
    }
}
