use thiserror::Error;

use crate::http::FetchError;

#[derive(Debug, Error)]
pub enum SatelliteError {
    #[error("N2YO API key not found. Please set the {env_var} environment variable")]
    MissingCredential { env_var: String },
    #[error("satellite API request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("satellite API error: {0}")]
    Rejected(String),
    #[error("unexpected satellite API response: {0}")]
    MalformedResponse(String),
}

/// A pass record that could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("skipped pass record {index}: {reason}")]
pub struct MalformedRecord {
    pub index: usize,
    pub reason: String,
}
