use crate::http::JsonFetcher;
use crate::location::Location;
use crate::satellite::error::SatelliteError;
use crate::satellite::parsing::{parse_passes, parse_position};
use crate::satellite::types::{ApiKey, PassQuery, Position, VisiblePasses};

pub const ISS_NORAD_ID: u32 = 25544;

pub trait SatelliteApi {
    /// Fails with `MissingCredential` when no usable API key is configured.
    fn check_credential(&self) -> Result<(), SatelliteError>;

    fn current_position(&self) -> Result<Position, SatelliteError>;

    fn visible_passes(
        &self,
        location: &Location,
        query: &PassQuery,
    ) -> Result<VisiblePasses, SatelliteError>;
}

/// Client for the N2YO REST API.
pub struct N2yoClient<F> {
    fetcher: F,
    base_url: String,
    satellite_id: u32,
    api_key: Option<ApiKey>,
    api_key_env: String,
}

impl<F: JsonFetcher> N2yoClient<F> {
    pub fn new(
        fetcher: F,
        base_url: impl Into<String>,
        satellite_id: u32,
        api_key: Option<ApiKey>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            satellite_id,
            api_key,
            api_key_env: api_key_env.into(),
        }
    }

    fn key(&self) -> Result<&ApiKey, SatelliteError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| SatelliteError::MissingCredential {
                env_var: self.api_key_env.clone(),
            })
    }

    fn get(&self, path: &str, key: &ApiKey) -> Result<serde_json::Value, SatelliteError> {
        let url = format!("{}/{}/", self.base_url, path);
        let body = self
            .fetcher
            .get_json(&url, &[("apiKey", key.expose().to_string())])?;
        Ok(body)
    }
}

impl<F: JsonFetcher> SatelliteApi for N2yoClient<F> {
    fn check_credential(&self) -> Result<(), SatelliteError> {
        self.key().map(|_| ())
    }

    fn current_position(&self) -> Result<Position, SatelliteError> {
        let key = self.key()?;
        log::info!("Fetching position of satellite {}", self.satellite_id);

        let body = self.get(&format!("positions/{}/0/0/0/1", self.satellite_id), key)?;
        parse_position(&body)
    }

    fn visible_passes(
        &self,
        location: &Location,
        query: &PassQuery,
    ) -> Result<VisiblePasses, SatelliteError> {
        let key = self.key()?;
        log::info!(
            "Fetching visible passes of satellite {} for {:.4}, {:.4} over {} days",
            self.satellite_id,
            location.latitude,
            location.longitude,
            query.days
        );

        let path = format!(
            "visualpasses/{}/{}/{}/{}/{}/{}",
            self.satellite_id,
            location.latitude,
            location.longitude,
            query.observer_altitude_m.round() as i64,
            query.days,
            query.min_visibility.as_secs()
        );
        let body = self.get(&path, key)?;
        let (mut passes, skipped) = parse_passes(&body)?;

        let before = passes.len();
        passes.retain(|p| p.max_elevation_deg >= query.min_elevation_deg);
        if passes.len() < before {
            log::debug!(
                "Dropped {} passes below {}° elevation",
                before - passes.len(),
                query.min_elevation_deg
            );
        }
        passes.sort_by_key(|p| p.start_utc);

        Ok(VisiblePasses { passes, skipped })
    }
}
