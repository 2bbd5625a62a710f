//! Row types shared by the store, the ingestor and the reporter.

use crate::types::timestamp::canonical_timestamp;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`. A value of exactly `0.0` is a valid
/// coordinate (equator / prime meridian), never a stand-in for "missing".
///
/// # Examples
///
/// ```
/// use weather_report::LatLon;
///
/// let zurich = LatLon(47.37, 8.55);
/// assert_eq!(zurich.lat(), 47.37);
/// assert_eq!(zurich.lon(), 8.55);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }
}

/// One normalized hourly reading as produced by the ingestor, before a
/// location is attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// A stored observation, as returned by window queries.
///
/// Serializes with the timestamp in its canonical RFC 3339 form
/// (`2025-01-01T00:00:00+00:00`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    #[serde(serialize_with = "serialize_canonical")]
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub lat: f64,
    pub lon: f64,
}

impl Observation {
    pub fn location(&self) -> LatLon {
        LatLon(self.lat, self.lon)
    }

    pub fn canonical_timestamp(&self) -> String {
        canonical_timestamp(&self.timestamp)
    }
}

fn serialize_canonical<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&canonical_timestamp(value))
}
