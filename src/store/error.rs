use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Data path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to open database '{0}'")]
    Open(PathBuf, #[source] rusqlite::Error),

    #[error("SQLite operation failed")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored timestamp '{0}' is not a valid RFC 3339 instant")]
    CorruptTimestamp(String),

    #[error("Window of {0} hours is out of range")]
    InvalidWindow(i64),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
