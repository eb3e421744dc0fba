use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("rate limited by {url}")]
    RateLimited { url: String },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Blocking GET returning a JSON document.
///
/// Every outbound request goes through this trait, so adapters can be
/// exercised against canned bodies.
pub trait JsonFetcher {
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, FetchError>;
}

impl<T: JsonFetcher + ?Sized> JsonFetcher for &T {
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, FetchError> {
        (**self).get_json(url, query)
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl JsonFetcher for HttpFetcher {
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, FetchError> {
        // Query values may hold credentials, only the path is logged.
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().map_err(|e| {
            if e.is_timeout() {
                classify(url, e)
            } else {
                FetchError::Decode {
                    url: url.to_string(),
                    source: e.without_url(),
                }
            }
        })
    }
}

/// reqwest errors carry the full URL, API key included, so it is stripped.
fn classify(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: err.without_url(),
        }
    }
}
