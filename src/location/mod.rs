mod error;
mod geocoder;
mod timezone;
mod types;

pub use error::{GeocodingError, TimezoneError};
pub use geocoder::{Geocoder, NominatimGeocoder};
pub use timezone::{TimezoneResolver, TzfResolver};
pub use types::{Location, LocationQuery};
