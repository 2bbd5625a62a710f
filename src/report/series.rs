//! Chart preparation shared by every renderer.
//!
//! Observations become two line series on a common x axis measured in hours
//! since the first observation. Null readings split a series into separate
//! segments instead of being drawn as zero.

use crate::report::error::ReportError;
use crate::types::observation::{LatLon, Observation};
use crate::types::timestamp::canonical_timestamp;
use chrono::{DateTime, Duration, Utc};
use std::ops::Range;

pub type Segment = Vec<(f64, f64)>;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub location: LatLon,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub temperature: Vec<Segment>,
    pub humidity: Vec<Segment>,
    pub temperature_range: Range<f64>,
    pub humidity_range: Range<f64>,
}

impl ChartSeries {
    /// Fails with [`ReportError::NoData`] when `rows` is empty.
    pub fn from_observations(rows: &[Observation]) -> Result<Self, ReportError> {
        let mut ordered: Vec<&Observation> = rows.iter().collect();
        ordered.sort_by_key(|o| o.timestamp);

        let (first, last) = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(ReportError::NoData),
        };
        let start = first.timestamp;

        let hours = |o: &Observation| (o.timestamp - start).num_seconds() as f64 / 3600.0;
        let temperature = segments(ordered.iter().map(|o| (hours(o), o.temperature)));
        let humidity = segments(ordered.iter().map(|o| (hours(o), o.humidity)));

        Ok(Self {
            location: first.location(),
            start,
            end: last.timestamp,
            temperature_range: value_range(&temperature),
            humidity_range: value_range(&humidity),
            temperature,
            humidity,
        })
    }

    /// Hours covered by the x axis; at least one so a single reading still
    /// gets a non-degenerate axis.
    pub fn span_hours(&self) -> f64 {
        ((self.end - self.start).num_seconds() as f64 / 3600.0).max(1.0)
    }

    pub fn x_range(&self) -> Range<f64> {
        0.0..self.span_hours()
    }

    /// Axis label for a point `offset_hours` after the first observation.
    pub fn hour_label(&self, offset_hours: f64) -> String {
        let at = self.start + Duration::seconds((offset_hours * 3600.0).round() as i64);
        at.format("%m-%d %H:%M").to_string()
    }

    /// `"<first> → <last>"` using canonical timestamps.
    pub fn range_label(&self) -> String {
        format!(
            "{} → {}",
            canonical_timestamp(&self.start),
            canonical_timestamp(&self.end)
        )
    }
}

fn segments(points: impl Iterator<Item = (f64, Option<f64>)>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    let mut current: Segment = Vec::new();
    for (x, y) in points {
        match y.filter(|v| v.is_finite()) {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Padded min..max over all segments; `0..1` when nothing was measured.
fn value_range(segments: &[Segment]) -> Range<f64> {
    let mut values = segments.iter().flatten().map(|(_, y)| *y);
    let Some(first) = values.next() else {
        return 0.0..1.0;
    };
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}
