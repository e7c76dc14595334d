//! Normalizes the JSON shapes time services answer with.
//!
//! Known shapes:
//!   - worldtimeapi: `{"datetime": "2024-01-01T14:30:45.123456-03:00", ...}`
//!   - timeapi.io:   `{"dateTime": "2024-01-01T14:30:45.1234567", ...}`
//!   - some timeapi.io endpoints: `{"currentDateTime": "..."}`

use super::provider::NaiveZone;
use super::ProviderError;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const DATETIME_FIELDS: [&str; 3] = ["datetime", "dateTime", "currentDateTime"];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Extract a local wall-clock date-time from a provider response body.
///
/// Values with a UTC offset are converted to the device's local zone;
/// naive values are read according to `naive_zone`.
pub fn parse_time_payload(
    body: &serde_json::Value,
    naive_zone: NaiveZone,
) -> Result<NaiveDateTime, ProviderError> {
    let raw = DATETIME_FIELDS
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .ok_or(ProviderError::UnrecognizedShape)?;

    parse_datetime(raw.trim(), naive_zone)
}

fn parse_datetime(raw: &str, naive_zone: NaiveZone) -> Result<NaiveDateTime, ProviderError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ProviderError::InvalidDateTime(raw.to_string()))?;

    Ok(match naive_zone {
        NaiveZone::ProviderLocal => naive,
        NaiveZone::Utc => Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local(),
    })
}
