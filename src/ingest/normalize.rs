use crate::ingest::error::IngestError;
use crate::ingest::response::HourlyBlock;
use crate::types::observation::ObservationRow;
use crate::types::timestamp::parse_observation_time;
use log::warn;
use serde_json::Value;

/// Zips the hourly arrays into rows.
///
/// Stops at the shortest array. Fails on the first unparseable timestamp or
/// non-numeric value; nothing is returned for a partially valid batch, so the
/// caller never stores half of a payload.
pub fn normalize_hourly(hourly: &HourlyBlock) -> Result<Vec<ObservationRow>, IngestError> {
    let lengths = [
        hourly.time.len(),
        hourly.temperature_2m.len(),
        hourly.relative_humidity_2m.len(),
    ];
    if lengths.iter().any(|len| *len != lengths[0]) {
        warn!(
            "Hourly arrays differ in length (time={}, temperature_2m={}, relative_humidity_2m={}); extra entries are ignored",
            lengths[0], lengths[1], lengths[2]
        );
    }

    hourly
        .time
        .iter()
        .zip(&hourly.temperature_2m)
        .zip(&hourly.relative_humidity_2m)
        .enumerate()
        .map(|(index, ((time, temperature), humidity))| {
            Ok(ObservationRow {
                timestamp: parse_time(time, index)?,
                temperature: coerce_number(temperature, "temperature_2m", index)?,
                humidity: coerce_number(humidity, "relative_humidity_2m", index)?,
            })
        })
        .collect()
}

fn parse_time(value: &Value, index: usize) -> Result<chrono::DateTime<chrono::Utc>, IngestError> {
    value
        .as_str()
        .and_then(parse_observation_time)
        .ok_or_else(|| IngestError::TimestampParse {
            index,
            value: value.to_string(),
        })
}

fn coerce_number(value: &Value, field: &'static str, index: usize) -> Result<Option<f64>, IngestError> {
    let invalid = || IngestError::InvalidNumber {
        field,
        index,
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_f64().map(Some).ok_or_else(invalid),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
