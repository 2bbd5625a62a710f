mod error;
mod ingest;
mod report;
mod settings;
mod store;
mod types;
mod utils;
pub mod web;

#[cfg(test)]
mod test_support;

pub use error::WeatherReportError;
pub use settings::{ReportSettings, ServerSettings, Settings, StorageSettings, UpstreamSettings};

pub use ingest::client::WeatherApiClient;
pub use ingest::error::IngestError;
pub use ingest::normalize::normalize_hourly;
pub use ingest::response::{ForecastResponse, HourlyBlock};
pub use ingest::{DateRange, Ingestor, ReportSummary};

pub use report::chart::{render_chart_image, render_chart_svg, CHART_TITLE};
pub use report::error::ReportError;
pub use report::html::{render_chart_page, render_index_page, render_no_data_page};
pub use report::pdf::render_pdf;
pub use report::series::ChartSeries;
pub use report::spreadsheet::{render_spreadsheet, SHEET_NAME, SPREADSHEET_COLUMNS};

pub use store::error::StoreError;
pub use store::ObservationStore;

pub use types::observation::{LatLon, Observation, ObservationRow};
pub use types::timestamp::{canonical_cutoff, canonical_timestamp, parse_observation_time};

pub use utils::default_database_path;
