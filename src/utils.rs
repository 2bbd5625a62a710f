use crate::store::error::StoreError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "weather_report";
const DATABASE_FILE_NAME: &str = "weather.db";

/// Default location of the SQLite database: the platform's local data
/// directory, or the working directory when none can be determined.
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATABASE_FILE_NAME)
}

pub fn ensure_data_dir_exists(path: &Path) -> Result<(), StoreError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(StoreError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating data directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| StoreError::DataDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(StoreError::DataDirCreation(path.to_path_buf(), e)),
    }
}
