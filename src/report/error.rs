use crate::store::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No data for the reporting window. Run /weather-report first.")]
    NoData,

    #[error("Failed to draw chart: {0}")]
    Chart(String),

    #[error("Failed to write spreadsheet")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to build PDF document: {0}")]
    Pdf(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
