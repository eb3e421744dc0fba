use thiserror::Error;

use crate::http::FetchError;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("no match for \"{0}\"")]
    NoMatch(String),
    #[error("geocoding request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("unexpected geocoder response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("no timezone covers {latitude:.4}, {longitude:.4}")]
    NotFound { latitude: f64, longitude: f64 },
    #[error("unknown timezone identifier: {0}")]
    UnknownZone(String),
}
