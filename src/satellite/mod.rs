mod client;
mod error;
mod parsing;
mod types;

pub use client::{N2yoClient, SatelliteApi, ISS_NORAD_ID};
pub use error::{MalformedRecord, SatelliteError};
pub use types::{ApiKey, Pass, PassQuery, Position, VisiblePasses};
