//! Console rendering of a pass report.
//!
//! Everything here is pure text generation; writing to the terminal is left
//! to the runner.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::compass::Compass;
use crate::location::Location;
use crate::satellite::{Pass, Position, VisiblePasses};

pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p %Z";
const GUIDE_TIME_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone)]
pub struct Report {
    pub location: Location,
    pub timezone: Tz,
    pub position: Position,
    pub passes: VisiblePasses,
}

pub fn local_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(LOCAL_TIME_FORMAT).to_string()
}

fn direction(azimuth_deg: f64) -> String {
    format!("{}° ({})", azimuth_deg, Compass::from_bearing(azimuth_deg))
}

pub fn format_location(location: &Location, tz: Tz) -> String {
    format!(
        "Location: {}\nCoordinates: {:.4}, {:.4}\nTimezone: {}",
        location.display_name,
        location.latitude,
        location.longitude,
        tz.name()
    )
}

pub fn format_position(position: &Position, tz: Tz) -> String {
    let mut out = format!(
        "Current ISS Position:\nLatitude: {:.4}°\nLongitude: {:.4}°\nAltitude: {:.2} km",
        position.latitude, position.longitude, position.altitude_km
    );
    if let Some(at) = position.timestamp {
        let _ = write!(out, "\nAs of: {}", local_time(at, tz));
    }
    out
}

/// Render one pass as a block of lines ending in a viewing guide.
pub fn format_pass(number: usize, pass: &Pass, tz: Tz) -> String {
    let start = pass.start_utc.with_timezone(&tz);
    let start_label = Compass::from_bearing(pass.start_azimuth_deg);
    let end_label = Compass::from_bearing(pass.end_azimuth_deg);

    let mut out = String::new();
    let _ = writeln!(out, "Pass {}:", number);
    let _ = writeln!(out, "Start: {}", local_time(pass.start_utc, tz));
    let _ = writeln!(out, "Starting direction: {}", direction(pass.start_azimuth_deg));
    let _ = writeln!(out, "Maximum Elevation: {}°", pass.max_elevation_deg);
    if let Some(max_utc) = pass.max_utc {
        let _ = write!(out, "Highest point: {}", local_time(max_utc, tz));
        if let Some(az) = pass.max_azimuth_deg {
            let _ = write!(out, " toward {}", direction(az));
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Ending direction: {}", direction(pass.end_azimuth_deg));
    let _ = writeln!(out, "End: {}", local_time(pass.end_utc, tz));
    let _ = writeln!(out, "Duration: {} seconds", pass.duration_sec);
    if let Some(mag) = pass.magnitude {
        let _ = writeln!(out, "Brightness: magnitude {}", mag);
    }
    let _ = write!(
        out,
        "Viewing guide: Look {} at {}, the ISS will rise to {}° above horizon and set {}",
        start_label,
        start.format(GUIDE_TIME_FORMAT),
        pass.max_elevation_deg,
        end_label
    );
    out
}

pub fn format_passes(passes: &VisiblePasses, tz: Tz) -> String {
    let mut out = String::new();
    if passes.passes.is_empty() {
        out.push_str("No upcoming visible passes found");
    } else {
        out.push_str("Upcoming visible passes:");
        for (i, pass) in passes.passes.iter().enumerate() {
            out.push_str("\n\n");
            out.push_str(&format_pass(i + 1, pass, tz));
        }
    }
    for skipped in &passes.skipped {
        let _ = write!(out, "\nWarning: {}", skipped);
    }
    out
}

pub fn render(report: &Report) -> String {
    [
        format_location(&report.location, report.timezone),
        format_position(&report.position, report.timezone),
        format_passes(&report.passes, report.timezone),
    ]
    .join("\n\n")
}
