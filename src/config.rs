use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::location::Location;
use crate::satellite::{PassQuery, ISS_NORAD_ID};

/// N2YO rejects look-ahead windows longer than this.
pub const MAX_DAYS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration for {field}: {message}")]
    Duration { field: &'static str, message: String },
    #[error("unknown timezone: {0}")]
    Timezone(String),
    #[error("days must be between 1 and 10, got {0}")]
    Days(u32),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub n2yo: N2yoConfig,
    pub geocoder: GeocoderConfig,
    pub passes: PassesConfig,
    pub http: HttpConfig,
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct N2yoConfig {
    pub base_url: String,
    pub satellite_id: u32,
    pub api_key_env: String,
}

impl Default for N2yoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.n2yo.com/rest/v1/satellite".to_string(),
            satellite_id: ISS_NORAD_ID,
            api_key_env: "N2YO_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub search_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            search_url: "https://nominatim.openstreetmap.org/search".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassesConfig {
    pub days: u32,
    /// Humantime string, e.g. "5m".
    pub min_visibility: String,
    pub min_elevation_deg: f64,
    pub observer_altitude_m: f64,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            days: MAX_DAYS,
            min_visibility: "5m".to_string(),
            min_elevation_deg: 0.0,
            observer_altitude_m: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout: String,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: "10s".to_string(),
            user_agent: "iss_tracker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub location: Location,
    pub timezone: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            location: Location::default(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every derived value once so later accessors cannot fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pass_query()?;
        self.request_timeout()?;
        self.fallback_timezone()?;
        Ok(())
    }

    pub fn pass_query(&self) -> Result<PassQuery, ConfigError> {
        if !(1..=MAX_DAYS).contains(&self.passes.days) {
            return Err(ConfigError::Days(self.passes.days));
        }
        Ok(PassQuery {
            observer_altitude_m: self.passes.observer_altitude_m,
            days: self.passes.days,
            min_visibility: parse_duration("passes.min_visibility", &self.passes.min_visibility)?,
            min_elevation_deg: self.passes.min_elevation_deg,
        })
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("http.timeout", &self.http.timeout)
    }

    pub fn fallback_timezone(&self) -> Result<Tz, ConfigError> {
        self.fallback
            .timezone
            .parse()
            .map_err(|_| ConfigError::Timezone(self.fallback.timezone.clone()))
    }
}

fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(s.trim()).map_err(|e| ConfigError::Duration {
        field,
        message: e.to_string(),
    })
}
