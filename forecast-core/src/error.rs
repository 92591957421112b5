use thiserror::Error;

/// Failures of a forecast lookup.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("city '{0}' could not be geocoded to a usable location")]
    CityNotFound(String),

    #[error("tonight's forecast is not available: {0}")]
    ForecastUnavailable(String),

    #[error("request to {service} failed")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} answered with status {status}: {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {service} response")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ForecastError {
    pub(crate) fn network(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Network { service, source }
    }

    pub(crate) fn parse(service: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Parse { service, source }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
