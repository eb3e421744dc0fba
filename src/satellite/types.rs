use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::satellite::error::MalformedRecord;

/// A predicted visible pass over the observer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub start_azimuth_deg: f64,
    pub end_azimuth_deg: f64,
    pub max_elevation_deg: f64,
    pub duration_sec: i64,
    pub max_utc: Option<DateTime<Utc>>,
    pub max_azimuth_deg: Option<f64>,
    /// Visual magnitude at peak, lower is brighter.
    pub magnitude: Option<f64>,
}

/// Sub-satellite point.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisiblePasses {
    /// Chronological by start time.
    pub passes: Vec<Pass>,
    pub skipped: Vec<MalformedRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassQuery {
    pub observer_altitude_m: f64,
    pub days: u32,
    pub min_visibility: Duration,
    pub min_elevation_deg: f64,
}

/// Credential for the tracking API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Blank keys are treated as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key.trim().to_string()))
        }
    }

    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(|v| Self::new(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
