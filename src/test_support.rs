//! Fixtures shared by the unit tests.

use crate::store::ObservationStore;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub type RecordedQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// An initialized store inside a fresh temporary directory. Keep the
/// `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, ObservationStore) {
    let tmp = TempDir::new().unwrap();
    let store = ObservationStore::new(tmp.path().join("weather.db"));
    store.init().unwrap();
    (tmp, store)
}

/// Serves `body` with `status` on `/v1/forecast` from a local port, standing
/// in for the weather API. Returns the endpoint URL and every query seen.
pub async fn spawn_upstream(status: StatusCode, body: serde_json::Value) -> (String, RecordedQueries) {
    let seen: RecordedQueries = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let app = Router::new().route(
        "/v1/forecast",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = Arc::clone(&recorder);
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(params);
                (status, Json(body))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1/forecast"), seen)
}

/// An address nothing listens on, for connection failures.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:9/v1/forecast";
