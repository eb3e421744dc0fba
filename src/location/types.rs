use serde::Deserialize;

pub const DEFAULT_COUNTRY: &str = "USA";

/// An observer position on the ground.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 34.0522,
            longitude: -118.2437,
            display_name: "Los Angeles, California, USA".to_string(),
        }
    }
}

impl Location {
    /// Parse a `"lat, lon"` pair, rejecting values outside Earth ranges.
    pub fn from_coordinates(coordinates: &str) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let latitude: f64 = parts[0].parse().ok()?;
        let longitude: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            display_name: format!("{:.4}, {:.4}", latitude, longitude),
        })
    }
}

/// Free-text address fields as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

impl LocationQuery {
    /// Build a query from raw fields. A blank city means "no query".
    pub fn new(city: &str, state: Option<&str>, country: Option<&str>) -> Option<Self> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY);
        Some(Self {
            city: city.to_string(),
            state: state.map(String::from),
            country: country.to_string(),
        })
    }

    pub fn to_query_string(&self) -> String {
        let mut query = self.city.clone();
        if let Some(state) = &self.state {
            query.push_str(", ");
            query.push_str(state);
        }
        query.push_str(", ");
        query.push_str(&self.country);
        query
    }
}
