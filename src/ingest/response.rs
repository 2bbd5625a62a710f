use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the weather API's forecast endpoint, reduced to the hourly block.
///
/// A missing `hourly` object, or missing arrays inside it, deserialize as
/// empty, which normalizes to zero rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub hourly: HourlyBlock,
}

/// Three parallel arrays, zipped positionally during normalization.
///
/// Values are kept as raw JSON so that nulls, integers and numeric strings
/// can be coerced (or rejected) per entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<Value>,
    #[serde(default)]
    pub temperature_2m: Vec<Value>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Value>,
}
