use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::satellite::error::{MalformedRecord, SatelliteError};
use crate::satellite::types::{Pass, Position};

#[derive(Debug, Deserialize)]
struct RawPosition {
    satlatitude: f64,
    satlongitude: f64,
    sataltitude: f64,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPass {
    #[serde(rename = "startUTC")]
    start_utc: i64,
    #[serde(rename = "endUTC")]
    end_utc: i64,
    start_az: f64,
    end_az: f64,
    max_el: f64,
    duration: i64,
    #[serde(rename = "maxUTC", default)]
    max_utc: Option<i64>,
    #[serde(default)]
    max_az: Option<f64>,
    #[serde(default)]
    mag: Option<f64>,
}

/// N2YO reports failures as `{"error": "..."}` with a 200 status.
pub fn check_api_error(body: &Value) -> Result<(), SatelliteError> {
    match body.get("error") {
        Some(Value::String(msg)) => Err(SatelliteError::Rejected(msg.clone())),
        Some(other) => Err(SatelliteError::Rejected(other.to_string())),
        None => Ok(()),
    }
}

pub fn parse_position(body: &Value) -> Result<Position, SatelliteError> {
    check_api_error(body)?;

    let positions = body
        .get("positions")
        .and_then(Value::as_array)
        .ok_or_else(|| SatelliteError::MalformedResponse("'positions' key not found".into()))?;
    let first = positions
        .first()
        .ok_or_else(|| SatelliteError::MalformedResponse("no position data returned".into()))?;

    let raw: RawPosition = serde_json::from_value(first.clone())
        .map_err(|e| SatelliteError::MalformedResponse(e.to_string()))?;

    Ok(Position {
        latitude: raw.satlatitude,
        longitude: raw.satlongitude,
        altitude_km: raw.sataltitude,
        timestamp: raw.timestamp.and_then(|t| DateTime::from_timestamp(t, 0)),
    })
}

/// Parse every pass record, setting aside the ones that cannot be used.
pub fn parse_passes(body: &Value) -> Result<(Vec<Pass>, Vec<MalformedRecord>), SatelliteError> {
    check_api_error(body)?;

    let records: &[Value] = match body.get("passes") {
        Some(Value::Array(records)) => records.as_slice(),
        Some(_) => {
            return Err(SatelliteError::MalformedResponse(
                "'passes' is not a list".into(),
            ))
        }
        // N2YO omits the key entirely when nothing is visible.
        None if pass_count(body) == Some(0) => &[],
        None => {
            return Err(SatelliteError::MalformedResponse(
                "'passes' key not found".into(),
            ))
        }
    };

    let mut passes = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match parse_pass(record) {
            Ok(pass) => passes.push(pass),
            Err(reason) => {
                let malformed = MalformedRecord {
                    index: i + 1,
                    reason,
                };
                log::warn!("{}", malformed);
                skipped.push(malformed);
            }
        }
    }

    Ok((passes, skipped))
}

fn pass_count(body: &Value) -> Option<u64> {
    body.get("info")?.get("passescount")?.as_u64()
}

fn parse_pass(record: &Value) -> Result<Pass, String> {
    let raw: RawPass = serde_json::from_value(record.clone()).map_err(|e| e.to_string())?;

    let start_utc = timestamp(raw.start_utc, "startUTC")?;
    let end_utc = timestamp(raw.end_utc, "endUTC")?;
    if end_utc < start_utc {
        return Err("pass ends before it starts".into());
    }

    Ok(Pass {
        start_utc,
        end_utc,
        start_azimuth_deg: raw.start_az,
        end_azimuth_deg: raw.end_az,
        max_elevation_deg: raw.max_el,
        duration_sec: raw.duration,
        max_utc: raw.max_utc.and_then(|t| DateTime::from_timestamp(t, 0)),
        max_azimuth_deg: raw.max_az,
        magnitude: raw.mag,
    })
}

fn timestamp(secs: i64, field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{} out of range: {}", field, secs))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn position_from_first_entry() {
        let body = json!({
            "info": {"satname": "SPACE STATION", "satid": 25544, "transactionscount": 1},
            "positions": [
                {"satlatitude": -39.9, "satlongitude": 158.3, "sataltitude": 417.85,
                 "azimuth": 254.5, "elevation": -69.0, "timestamp": 1735446615}
            ]
        });
        let pos = parse_position(&body).unwrap();
        assert_eq!(pos.latitude, -39.9);
        assert_eq!(pos.longitude, 158.3);
        assert_eq!(pos.altitude_km, 417.85);
        assert_eq!(pos.timestamp.unwrap().timestamp(), 1735446615);
    }

    #[test]
    fn api_error_field_is_rejected() {
        let body = json!({"error": "Invalid API Key!"});
        let err = parse_position(&body).unwrap_err();
        assert!(matches!(err, SatelliteError::Rejected(msg) if msg == "Invalid API Key!"));
    }

    #[test]
    fn missing_or_empty_positions() {
        let err = parse_position(&json!({"info": {}})).unwrap_err();
        assert!(matches!(err, SatelliteError::MalformedResponse(_)));

        let err = parse_position(&json!({"positions": []})).unwrap_err();
        assert!(matches!(err, SatelliteError::MalformedResponse(m) if m.contains("no position")));
    }

    #[test]
    fn malformed_record_is_skipped() {
        let body = json!({
            "info": {"passescount": 3},
            "passes": [
                {"startAz": 315.0, "startUTC": 1735446615, "maxEl": 45.0, "endAz": 135.0,
                 "endUTC": 1735446945, "duration": 330},
                {"startAz": 200.0, "startUTC": 1735533015, "endAz": 80.0,
                 "endUTC": 1735533315, "duration": 300},
                {"startAz": 250.0, "startUTC": 1735619415, "maxEl": 20.5, "endAz": 60.0,
                 "endUTC": 1735619775, "duration": 360, "mag": -1.8}
            ]
        });
        let (passes, skipped) = parse_passes(&body).unwrap();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[1].magnitude, Some(-1.8));
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 2);
        assert!(skipped[0].reason.contains("maxEl"), "{}", skipped[0].reason);
    }

    #[test]
    fn reversed_interval_is_skipped() {
        let body = json!({"passes": [
            {"startAz": 1.0, "startUTC": 2000, "maxEl": 10.0, "endAz": 2.0, "endUTC": 1000, "duration": 0}
        ]});
        let (passes, skipped) = parse_passes(&body).unwrap();
        assert!(passes.is_empty());
        assert_eq!(skipped[0].reason, "pass ends before it starts");
    }

    #[test]
    fn absent_passes_with_zero_count_is_empty() {
        let body = json!({"info": {"satid": 25544, "passescount": 0}});
        let (passes, skipped) = parse_passes(&body).unwrap();
        assert!(passes.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn absent_passes_otherwise_is_malformed() {
        let err = parse_passes(&json!({"info": {}})).unwrap_err();
        assert!(matches!(err, SatelliteError::MalformedResponse(_)));
    }
}
