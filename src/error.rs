use crate::ingest::error::IngestError;
use crate::report::error::ReportError;
use crate::store::error::StoreError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum WeatherReportError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Validation(String),

    #[error("Background task failed")]
    TaskJoin(#[from] JoinError),

    #[error("Failed to bind to '{0}'")]
    Bind(String, #[source] std::io::Error),

    #[error("Server error")]
    Serve(#[source] std::io::Error),
}
