use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::location::error::TimezoneError;

pub trait TimezoneResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, TimezoneError>;
}

/// Offline lookup against the timezone boundary data bundled with tzf-rs.
pub struct TzfResolver {
    finder: DefaultFinder,
}

impl TzfResolver {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl TimezoneResolver for TzfResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, TimezoneError> {
        // tzf takes longitude first.
        let name = self.finder.get_tz_name(longitude, latitude);
        parse_zone(name, latitude, longitude)
    }
}

fn parse_zone(name: &str, latitude: f64, longitude: f64) -> Result<Tz, TimezoneError> {
    if name.is_empty() {
        return Err(TimezoneError::NotFound {
            latitude,
            longitude,
        });
    }
    name.parse::<Tz>()
        .map_err(|_| TimezoneError::UnknownZone(name.to_string()))
}
