use serde::Deserialize;

use crate::http::JsonFetcher;
use crate::location::error::GeocodingError;
use crate::location::types::{Location, LocationQuery};

pub trait Geocoder {
    fn geocode(&self, query: &LocationQuery) -> Result<Location, GeocodingError>;
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct NominatimGeocoder<F> {
    fetcher: F,
    search_url: String,
}

impl<F: JsonFetcher> NominatimGeocoder<F> {
    pub fn new(fetcher: F, search_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            search_url: search_url.into(),
        }
    }
}

impl<F: JsonFetcher> Geocoder for NominatimGeocoder<F> {
    fn geocode(&self, query: &LocationQuery) -> Result<Location, GeocodingError> {
        let q = query.to_query_string();
        log::info!("Geocoding \"{}\"", q);

        let body = self.fetcher.get_json(
            &self.search_url,
            &[
                ("q", q.clone()),
                ("format", "json".to_string()),
                ("limit", "1".to_string()),
            ],
        )?;

        let hits: Vec<SearchHit> = serde_json::from_value(body)
            .map_err(|e| GeocodingError::MalformedResponse(e.to_string()))?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NoMatch(q.clone()))?;

        let latitude = parse_coordinate(&hit.lat, "lat")?;
        let longitude = parse_coordinate(&hit.lon, "lon")?;

        Ok(Location {
            latitude,
            longitude,
            display_name: hit.display_name,
        })
    }
}

fn parse_coordinate(value: &str, field: &str) -> Result<f64, GeocodingError> {
    value
        .trim()
        .parse()
        .map_err(|_| GeocodingError::MalformedResponse(format!("bad {}: {:?}", field, value)))
}
