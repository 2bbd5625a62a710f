use crate::store::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode weather API response from {0}")]
    InvalidBody(String, #[source] reqwest::Error),

    #[error("Unrecognised timestamp {value} at position {index}")]
    TimestampParse { index: usize, value: String },

    #[error("Non-numeric value {value} in '{field}' at position {index}")]
    InvalidNumber {
        field: &'static str,
        index: usize,
        value: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    /// The weather API could not be reached or answered with something unusable.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            IngestError::NetworkRequest(..)
                | IngestError::HttpStatus { .. }
                | IngestError::InvalidBody(..)
        )
    }

    /// The payload was received but one of its values could not be normalized.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            IngestError::TimestampParse { .. } | IngestError::InvalidNumber { .. }
        )
    }
}
