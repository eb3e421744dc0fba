use std::io::{self, Write};

use chrono_tz::Tz;
use thiserror::Error;

use crate::location::{Geocoder, GeocodingError, Location, LocationQuery, TimezoneResolver};
use crate::report::{self, Report};
use crate::satellite::{PassQuery, SatelliteApi, SatelliteError};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Satellite(#[from] SatelliteError),
    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

type RunnerResult<T> = Result<T, RunnerError>;

/// Where the observer is, as given by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Default,
    Query(LocationQuery),
    Coordinates(Location),
}

#[derive(Debug)]
pub enum LocationResolution {
    Found(Location),
    Default(Location),
    Fallback {
        query: LocationQuery,
        location: Location,
        reason: GeocodingError,
    },
}

impl LocationResolution {
    pub fn location(&self) -> &Location {
        match self {
            LocationResolution::Found(l) | LocationResolution::Default(l) => l,
            LocationResolution::Fallback { location, .. } => location,
        }
    }
}

pub struct Runner<G, T, S> {
    pub geocoder: G,
    pub timezones: T,
    pub satellite: S,
    pub pass_query: PassQuery,
    pub fallback_location: Location,
    pub fallback_timezone: Tz,
}

impl<G: Geocoder, T: TimezoneResolver, S: SatelliteApi> Runner<G, T, S> {
    pub fn check_credential(&self) -> RunnerResult<()> {
        self.satellite.check_credential()?;
        Ok(())
    }

    pub fn resolve_location(&self, target: Target) -> LocationResolution {
        match target {
            Target::Default => LocationResolution::Default(self.fallback_location.clone()),
            Target::Coordinates(location) => LocationResolution::Found(location),
            Target::Query(query) => match self.geocoder.geocode(&query) {
                Ok(location) => LocationResolution::Found(location),
                Err(reason) => {
                    log::warn!("Geocoding failed: {}", reason);
                    LocationResolution::Fallback {
                        query,
                        location: self.fallback_location.clone(),
                        reason,
                    }
                }
            },
        }
    }

    /// Look up the zone for a location. Failure falls back to the configured
    /// zone; the error is returned alongside so it can be reported.
    pub fn resolve_timezone(&self, location: &Location) -> (Tz, Option<String>) {
        match self
            .timezones
            .resolve(location.latitude, location.longitude)
        {
            Ok(tz) => (tz, None),
            Err(e) => {
                log::warn!("Timezone lookup failed: {}", e);
                (self.fallback_timezone, Some(e.to_string()))
            }
        }
    }

    /// Produce the full report for `target`, printing notices and the report to `out`.
    pub fn run<W: Write>(&self, target: Target, out: &mut W) -> RunnerResult<Report> {
        self.check_credential()?;

        let resolution = self.resolve_location(target);
        match &resolution {
            LocationResolution::Found(l) => writeln!(out, "\nFound location: {}", l.display_name)?,
            LocationResolution::Default(l) => {
                writeln!(out, "\nUsing default location: {}", l.display_name)?
            }
            LocationResolution::Fallback {
                query,
                location,
                reason,
            } => writeln!(
                out,
                "\nCould not find coordinates for {} ({}), using {} as default",
                query.to_query_string(),
                reason,
                location.display_name
            )?,
        }
        let location = resolution.location().clone();

        let (timezone, tz_failure) = self.resolve_timezone(&location);
        if let Some(reason) = tz_failure {
            writeln!(out, "Warning: {}, showing times in {}", reason, timezone.name())?;
        }

        log::info!("Fetching ISS position");
        let position = self.satellite.current_position()?;
        log::info!("Fetching upcoming passes");
        let passes = self.satellite.visible_passes(&location, &self.pass_query)?;

        let report = Report {
            location,
            timezone,
            position,
            passes,
        };
        writeln!(out, "\n{}", report::render(&report))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use chrono::DateTime;

    use super::*;
    use crate::http::FetchError;
    use crate::location::TimezoneError;
    use crate::satellite::{MalformedRecord, Pass, Position, VisiblePasses};

    struct FakeGeocoder {
        result: Option<Location>,
        calls: Cell<usize>,
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, query: &LocationQuery) -> Result<Location, GeocodingError> {
            self.calls.set(self.calls.get() + 1);
            self.result
                .clone()
                .ok_or_else(|| GeocodingError::NoMatch(query.to_query_string()))
        }
    }

    struct FakeZones(Option<Tz>);

    impl TimezoneResolver for FakeZones {
        fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, TimezoneError> {
            self.0.ok_or(TimezoneError::NotFound {
                latitude,
                longitude,
            })
        }
    }

    #[derive(Default)]
    struct FakeSatellite {
        no_key: bool,
        fail_passes: bool,
        calls: Cell<usize>,
    }

    impl SatelliteApi for FakeSatellite {
        fn check_credential(&self) -> Result<(), SatelliteError> {
            if self.no_key {
                Err(SatelliteError::MissingCredential {
                    env_var: "N2YO_API_KEY".into(),
                })
            } else {
                Ok(())
            }
        }

        fn current_position(&self) -> Result<Position, SatelliteError> {
            self.check_credential()?;
            self.calls.set(self.calls.get() + 1);
            Ok(Position {
                latitude: 12.0,
                longitude: 34.0,
                altitude_km: 419.5,
                timestamp: None,
            })
        }

        fn visible_passes(
            &self,
            _location: &Location,
            _query: &PassQuery,
        ) -> Result<VisiblePasses, SatelliteError> {
            self.check_credential()?;
            self.calls.set(self.calls.get() + 1);
            if self.fail_passes {
                return Err(SatelliteError::Fetch(FetchError::Timeout {
                    url: "https://n2yo.example".into(),
                }));
            }
            Ok(VisiblePasses {
                passes: vec![Pass {
                    start_utc: DateTime::from_timestamp(1735446615, 0).unwrap(),
                    end_utc: DateTime::from_timestamp(1735446945, 0).unwrap(),
                    start_azimuth_deg: 315.0,
                    end_azimuth_deg: 135.0,
                    max_elevation_deg: 45.0,
                    duration_sec: 330,
                    max_utc: None,
                    max_azimuth_deg: None,
                    magnitude: None,
                }],
                skipped: vec![MalformedRecord {
                    index: 2,
                    reason: "missing field `maxEl`".into(),
                }],
            })
        }
    }

    fn runner(
        geocoded: Option<Location>,
        zone: Option<Tz>,
        satellite: FakeSatellite,
    ) -> Runner<FakeGeocoder, FakeZones, FakeSatellite> {
        Runner {
            geocoder: FakeGeocoder {
                result: geocoded,
                calls: Cell::new(0),
            },
            timezones: FakeZones(zone),
            satellite,
            pass_query: PassQuery {
                observer_altitude_m: 0.0,
                days: 10,
                min_visibility: Duration::from_secs(300),
                min_elevation_deg: 0.0,
            },
            fallback_location: Location::default(),
            fallback_timezone: chrono_tz::UTC,
        }
    }

    fn denver() -> Location {
        Location {
            latitude: 39.7392,
            longitude: -104.9903,
            display_name: "Denver, Colorado, United States".into(),
        }
    }

    fn query(city: &str) -> Target {
        Target::Query(LocationQuery::new(city, None, None).unwrap())
    }

    #[test]
    fn geocoded_location_is_used() {
        let r = runner(
            Some(denver()),
            Some(chrono_tz::America::Denver),
            FakeSatellite::default(),
        );
        let mut out = Vec::new();
        let report = r.run(query("Denver"), &mut out).unwrap();

        assert_eq!(report.location, denver());
        assert_eq!(report.timezone, chrono_tz::America::Denver);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Found location: Denver, Colorado"));
        assert!(text.contains("Timezone: America/Denver"));
        assert!(text.contains("Start: 2024-12-28 09:30:15 PM MST"));
        assert!(text.contains("Warning: skipped pass record 2"));
    }

    #[test]
    fn unresolvable_location_falls_back_to_los_angeles() {
        let r = runner(
            None,
            Some(chrono_tz::America::Los_Angeles),
            FakeSatellite::default(),
        );
        let mut out = Vec::new();
        let report = r.run(query("Xyzzyville"), &mut out).unwrap();

        assert_eq!(report.location.latitude, 34.0522);
        assert_eq!(report.location.longitude, -118.2437);
        assert!(report.location.display_name.contains("Los Angeles"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Could not find coordinates for Xyzzyville, USA"));
        assert!(text.contains("Start: 2024-12-28 08:30:15 PM PST"));
    }

    #[test]
    fn default_target_skips_geocoder() {
        let r = runner(Some(denver()), None, FakeSatellite::default());
        let mut out = Vec::new();
        let report = r.run(Target::Default, &mut out).unwrap();

        assert_eq!(r.geocoder.calls.get(), 0);
        assert_eq!(report.location, Location::default());
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Using default location: Los Angeles"));
    }

    #[test]
    fn coordinates_skip_geocoder() {
        let r = runner(None, Some(chrono_tz::Europe::London), FakeSatellite::default());
        let target = Target::Coordinates(Location::from_coordinates("51.5, -0.12").unwrap());
        let report = r.run(target, &mut Vec::new()).unwrap();

        assert_eq!(r.geocoder.calls.get(), 0);
        assert_eq!(report.location.latitude, 51.5);
    }

    #[test]
    fn timezone_failure_uses_fallback_zone() {
        let r = runner(Some(denver()), None, FakeSatellite::default());
        let mut out = Vec::new();
        let report = r.run(query("Denver"), &mut out).unwrap();

        assert_eq!(report.timezone, chrono_tz::UTC);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("showing times in UTC"));
        assert!(text.contains("Start: 2024-12-29 04:30:15 AM UTC"));
    }

    #[test]
    fn missing_credential_stops_before_any_lookup() {
        let r = runner(
            Some(denver()),
            None,
            FakeSatellite {
                no_key: true,
                ..Default::default()
            },
        );
        let mut out = Vec::new();
        let err = r.run(query("Denver"), &mut out).unwrap_err();

        assert!(matches!(
            err,
            RunnerError::Satellite(SatelliteError::MissingCredential { .. })
        ));
        assert_eq!(r.geocoder.calls.get(), 0);
        assert_eq!(r.satellite.calls.get(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn satellite_failure_is_fatal() {
        let r = runner(
            Some(denver()),
            None,
            FakeSatellite {
                fail_passes: true,
                ..Default::default()
            },
        );
        let err = r.run(query("Denver"), &mut Vec::new()).unwrap_err();

        assert!(matches!(
            err,
            RunnerError::Satellite(SatelliteError::Fetch(FetchError::Timeout { .. }))
        ));
        assert!(err.to_string().contains("timed out"));
    }
}
