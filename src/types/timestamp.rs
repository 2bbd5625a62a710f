use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// Zone-less ISO-8601 layouts accepted from the weather API, tried in order.
const NAIVE_ISO_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
/// ISO-8601 with an offset but without seconds, e.g. `2025-01-01T00:00+02:00`.
const OFFSET_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";
const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses a time string from the weather API.
///
/// ISO-8601 is tried first; a value without an offset is taken as UTC. If no
/// ISO layout matches, the fixed `YYYY-MM-DD HH:MM` layout is tried. Values
/// carrying another offset are converted to UTC.
///
/// ```
/// use weather_report::{canonical_timestamp, parse_observation_time};
///
/// let parsed = parse_observation_time("2025-01-01T00:00").unwrap();
/// assert_eq!(canonical_timestamp(&parsed), "2025-01-01T00:00:00+00:00");
/// assert!(parse_observation_time("yesterday").is_none());
/// ```
pub fn parse_observation_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    let with_offset = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, OFFSET_MINUTE_FORMAT));
    if let Ok(with_offset) = with_offset {
        return Some(with_offset.with_timezone(&Utc));
    }

    NAIVE_ISO_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| NaiveDateTime::parse_from_str(value, FALLBACK_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// The stored form of a timestamp: RFC 3339, second precision, `+00:00` offset.
///
/// All stored keys share this exact layout, so lexical order equals time order.
pub fn canonical_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Canonical form of a lower bound. Sub-second cutoffs round up to the next
/// whole second, so a `>=` comparison never admits an older key.
pub fn canonical_cutoff(value: &DateTime<Utc>) -> String {
    let truncated = value.with_nanosecond(0).unwrap_or(*value);
    if truncated == *value {
        return canonical_timestamp(value);
    }
    canonical_timestamp(&(truncated + Duration::seconds(1)))
}
