//! SQLite-backed observation table.
//!
//! Every operation opens its own connection and drops it when done; the only
//! coordination between concurrent requests is SQLite's own file locking.

pub mod error;

use crate::store::error::StoreError;
use crate::types::observation::{LatLon, Observation, ObservationRow};
use crate::types::timestamp::{canonical_cutoff, canonical_timestamp};
use crate::utils::ensure_data_dir_exists;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tokio::task;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS weather (
        timestamp TEXT PRIMARY KEY,
        temperature REAL,
        humidity REAL,
        lat REAL,
        lon REAL
    )";

const UPSERT: &str = "
    INSERT INTO weather (timestamp, temperature, humidity, lat, lon)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(timestamp) DO UPDATE SET
        temperature = excluded.temperature,
        humidity = excluded.humidity,
        lat = excluded.lat,
        lon = excluded.lon";

const SELECT_SINCE: &str = "
    SELECT timestamp, temperature, humidity, lat, lon
    FROM weather
    WHERE timestamp >= ?1
    ORDER BY timestamp ASC";

#[derive(Debug, Clone)]
pub struct ObservationStore {
    database_path: PathBuf,
}

impl ObservationStore {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.database_path)
            .map_err(|e| StoreError::Open(self.database_path.clone(), e))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Creates the database directory and the `weather` table if missing.
    /// Safe to call on every startup.
    pub fn init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self
            .database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            ensure_data_dir_exists(parent)?;
        }
        self.connect()?.execute_batch(SCHEMA)?;
        info!("Observation store ready at {}", self.database_path.display());
        Ok(())
    }

    /// Writes or replaces one row per timestamp, attaching `location` to each.
    ///
    /// The whole batch is applied in a single transaction: either every row is
    /// written or none is. Returns the number of rows written.
    pub fn upsert(&self, rows: &[ObservationRow], location: LatLon) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT)?;
            for row in rows {
                stmt.execute(params![
                    canonical_timestamp(&row.timestamp),
                    row.temperature,
                    row.humidity,
                    location.lat(),
                    location.lon(),
                ])?;
            }
        }
        tx.commit()?;
        debug!(
            "Upserted {} rows for lat={}, lon={}",
            rows.len(),
            location.lat(),
            location.lon()
        );
        Ok(rows.len())
    }

    /// All rows from the last `window_hours` hours, oldest first.
    pub fn query_recent(&self, window_hours: i64) -> Result<Vec<Observation>, StoreError> {
        let cutoff = Duration::try_hours(window_hours)
            .filter(|window| *window >= Duration::zero())
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or(StoreError::InvalidWindow(window_hours))?;
        self.query_since(cutoff)
    }

    /// All rows with `timestamp >= cutoff`, oldest first.
    pub fn query_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Observation>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_SINCE)?;
        let mut rows = stmt.query(params![canonical_cutoff(&cutoff)])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            let timestamp = DateTime::parse_from_rfc3339(&raw)
                .map_err(|_| StoreError::CorruptTimestamp(raw.clone()))?
                .with_timezone(&Utc);
            out.push(Observation {
                timestamp,
                temperature: row.get(1)?,
                humidity: row.get(2)?,
                lat: row.get(3)?,
                lon: row.get(4)?,
            });
        }
        Ok(out)
    }

    /// [`Self::upsert`] on the blocking thread pool.
    pub async fn upsert_async(
        &self,
        rows: Vec<ObservationRow>,
        location: LatLon,
    ) -> Result<usize, StoreError> {
        let store = self.clone();
        task::spawn_blocking(move || store.upsert(&rows, location)).await?
    }

    /// [`Self::query_recent`] on the blocking thread pool.
    pub async fn query_recent_async(&self, window_hours: i64) -> Result<Vec<Observation>, StoreError> {
        let store = self.clone();
        task::spawn_blocking(move || store.query_recent(window_hours)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use chrono::{TimeZone, Timelike};

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        let now = Utc::now();
        now.with_nanosecond(0).unwrap_or(now) - Duration::hours(hours)
    }

    fn row(timestamp: DateTime<Utc>, temperature: Option<f64>, humidity: Option<f64>) -> ObservationRow {
        ObservationRow {
            timestamp,
            temperature,
            humidity,
        }
    }

    #[test]
    fn init_is_idempotent() {
        let (_tmp, store) = temp_store();
        store.init().unwrap();
        store.init().unwrap();
        assert!(store.query_recent(48).unwrap().is_empty());
    }

    #[test]
    fn init_creates_nested_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ObservationStore::new(tmp.path().join("nested").join("weather.db"));
        store.init().unwrap();
        assert!(store.database_path().exists());
    }

    #[test]
    fn upsert_twice_is_idempotent() {
        let (_tmp, store) = temp_store();
        let rows = vec![row(hours_ago(2), Some(12.5), Some(70.0))];
        let location = LatLon(47.37, 8.55);

        store.upsert(&rows, location).unwrap();
        let once = store.query_recent(48).unwrap();
        store.upsert(&rows, location).unwrap();
        let twice = store.query_recent(48).unwrap();

        assert_eq!(once.len(), 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn later_write_replaces_every_field() {
        let (_tmp, store) = temp_store();
        let ts = hours_ago(3);

        store
            .upsert(&[row(ts, Some(10.0), Some(50.0))], LatLon(47.37, 8.55))
            .unwrap();
        store
            .upsert(&[row(ts, None, Some(90.0))], LatLon(52.52, 13.40))
            .unwrap();

        let stored = store.query_recent(48).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0],
            Observation {
                timestamp: ts,
                temperature: None,
                humidity: Some(90.0),
                lat: 52.52,
                lon: 13.40,
            }
        );
    }

    #[test]
    fn window_excludes_old_rows_and_orders_ascending() {
        let (_tmp, store) = temp_store();
        let rows = vec![
            row(hours_ago(1), Some(3.0), Some(60.0)),
            row(hours_ago(72), Some(1.0), Some(40.0)),
            row(hours_ago(47), Some(2.0), Some(50.0)),
            row(hours_ago(49), Some(0.5), Some(45.0)),
        ];
        store.upsert(&rows, LatLon(0.0, 0.0)).unwrap();

        let recent = store.query_recent(48).unwrap();
        let cutoff = Utc::now() - Duration::hours(48);
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|o| o.timestamp >= cutoff));
        assert!(recent.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(recent[0].temperature, Some(2.0));
        assert_eq!(recent[1].temperature, Some(3.0));
    }

    #[test]
    fn query_since_reads_back_exact_values() {
        let (_tmp, store) = temp_store();
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        store
            .upsert(&[row(ts, Some(1.5), None)], LatLon(47.37, 8.55))
            .unwrap();

        let stored = store
            .query_since(Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].canonical_timestamp(), "2025-01-01T00:00:00+00:00");
        assert_eq!(stored[0].temperature, Some(1.5));
        assert_eq!(stored[0].humidity, None);
    }

    #[test]
    fn fractional_cutoff_excludes_earlier_second() {
        let (_tmp, store) = temp_store();
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        store
            .upsert(&[row(ts, Some(4.0), Some(55.0))], LatLon(47.37, 8.55))
            .unwrap();

        let after = store.query_since(ts + Duration::milliseconds(500)).unwrap();
        assert!(after.is_empty());

        let before = store.query_since(ts - Duration::milliseconds(500)).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].timestamp, ts);
    }

    #[test]
    fn out_of_range_window_is_an_error() {
        let (_tmp, store) = temp_store();

        for window in [i64::MAX, -1] {
            assert!(matches!(
                store.query_recent(window),
                Err(StoreError::InvalidWindow(w)) if w == window
            ));
        }
        assert!(store.query_recent(0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn async_wrappers_round_trip() {
        let (_tmp, store) = temp_store();
        let written = store
            .upsert_async(vec![row(hours_ago(5), Some(8.0), Some(81.0))], LatLon(1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(written, 1);

        let rows = store.query_recent_async(48).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location(), LatLon(1.0, 2.0));
    }
}
