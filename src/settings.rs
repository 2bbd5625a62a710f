//! Process configuration.
//!
//! Layered, lowest precedence first: built-in defaults, an optional TOML file
//! (`weather_report.toml`, or the path in `WEATHER_REPORT_CONFIG`), then
//! environment variables such as `WEATHER_REPORT_SERVER__PORT=8080`.

use crate::utils::default_database_path;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "WEATHER_REPORT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "weather_report.toml";
const ENV_PREFIX: &str = "WEATHER_REPORT";
/// Ten years of hourly history.
const MAX_WINDOW_HOURS: i64 = 24 * 366 * 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub upstream: UpstreamSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageSettings {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamSettings {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// Width of the window served by the chart and export endpoints.
    pub window_hours: i64,
    /// Calendar days before today requested on each ingest.
    pub lookback_days: u64,
}

impl Settings {
    /// Loads defaults, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(Path::new(&path))
    }

    /// Like [`Self::load`], reading the file at `path` if it exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let window = self.report.window_hours;
        if !(1..=MAX_WINDOW_HOURS).contains(&window) {
            return Err(ConfigError::Message(format!(
                "report.window_hours must be between 1 and {MAX_WINDOW_HOURS}, got {window}"
            )));
        }
        Ok(self)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default(
                "storage.database_path",
                default_database_path().to_string_lossy().into_owned(),
            )?
            .set_default("upstream.api_url", "https://api.open-meteo.com/v1/forecast")?
            .set_default("upstream.timeout_secs", 20_i64)?
            .set_default("report.window_hours", 48_i64)?
            .set_default("report.lookback_days", 2_i64)
    }
}
