//! HTTP surface: JSON for ingestion, HTML for views, attachments for exports.

pub mod error;
pub mod handlers;

use crate::error::WeatherReportError;
use crate::ingest::Ingestor;
use crate::settings::Settings;
use crate::store::ObservationStore;
use axum::routing::get;
use axum::Router;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub store: ObservationStore,
    pub ingestor: Arc<Ingestor>,
    /// Hours of history served by the chart and export routes.
    pub window_hours: i64,
}

impl AppState {
    /// Opens (and creates if needed) the configured store and wires the
    /// ingestor to it.
    pub fn from_settings(settings: &Settings) -> Result<Self, WeatherReportError> {
        let store = ObservationStore::new(settings.storage.database_path.clone());
        store.init()?;
        let ingestor = Ingestor::from_settings(
            &settings.upstream,
            store.clone(),
            settings.report.lookback_days,
        )?;
        Ok(Self {
            store,
            ingestor: Arc::new(ingestor),
            window_hours: settings.report.window_hours,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chart", get(handlers::chart))
        .route("/weather-report", get(handlers::weather_report))
        .route("/export/excel", get(handlers::export_excel))
        .route("/export/pdf", get(handlers::export_pdf))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(settings: &Settings) -> Result<(), WeatherReportError> {
    let state = AppState::from_settings(settings)?;
    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| WeatherReportError::Bind(address.clone(), e))?;
    info!(
        "Serving weather reports on http://{} (database: {})",
        address,
        state.store.database_path().display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .map_err(WeatherReportError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::client::WeatherApiClient;
    use crate::test_support::{spawn_upstream, temp_store, UNREACHABLE_UPSTREAM};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use calamine::{Data, Reader, Xlsx};
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::{json, Value};
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

    fn app(upstream: &str) -> (TempDir, Router) {
        let (tmp, store) = temp_store();
        let client = WeatherApiClient::new(upstream, Duration::from_secs(5)).unwrap();
        let state = AppState {
            store: store.clone(),
            ingestor: Arc::new(Ingestor::new(client, store, 2)),
            window_hours: 48,
        };
        (tmp, router(state))
    }

    async fn request(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    fn recent_payload() -> Value {
        let base = Utc::now() - ChronoDuration::hours(4);
        let times: Vec<String> = (0..3)
            .map(|h| (base + ChronoDuration::hours(h)).format("%Y-%m-%dT%H:00").to_string())
            .collect();
        json!({"hourly": {
            "time": times,
            "temperature_2m": [1.5, null, 2.5],
            "relative_humidity_2m": [80, 82, null]
        }})
    }

    #[tokio::test]
    async fn missing_lon_is_bad_request() {
        let (_tmp, app) = app(UNREACHABLE_UPSTREAM);
        let (status, _, body) = request(&app, "/weather-report?lat=47.37").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = json_body(&body);
        assert!(json["error"].as_str().unwrap().contains("lon"));
    }

    #[tokio::test]
    async fn non_numeric_lat_is_bad_request() {
        let (_tmp, app) = app(UNREACHABLE_UPSTREAM);
        let (status, _, body) = request(&app, "/weather-report?lat=abc&lon=8.55").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_body(&body).get("error").is_some());
    }

    #[tokio::test]
    async fn zero_coordinates_reach_upstream() {
        let (_tmp, app) = app(UNREACHABLE_UPSTREAM);
        let (status, _, body) = request(&app, "/weather-report?lat=0&lon=0").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json = json_body(&body);
        assert!(json["error"].as_str().unwrap().contains("127.0.0.1:9"));
        assert!(json.get("details").is_some());
    }

    #[tokio::test]
    async fn upstream_status_is_bad_gateway() {
        let (url, _) = spawn_upstream(
            StatusCode::BAD_REQUEST,
            json!({"error": true, "reason": "Invalid date"}),
        )
        .await;
        let (_tmp, app) = app(&url);
        let (status, _, body) = request(&app, "/weather-report?lat=47.37&lon=8.55").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("400"));
    }

    #[tokio::test]
    async fn malformed_upstream_timestamp_is_unprocessable() {
        let (url, _) = spawn_upstream(
            StatusCode::OK,
            json!({"hourly": {
                "time": ["yesterday"],
                "temperature_2m": [1.0],
                "relative_humidity_2m": [50]
            }}),
        )
        .await;
        let (_tmp, app) = app(&url);
        let (status, _, body) = request(&app, "/weather-report?lat=47.37&lon=8.55").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("yesterday"));
    }

    #[tokio::test]
    async fn empty_store_exports_are_not_found() {
        let (_tmp, app) = app(UNREACHABLE_UPSTREAM);

        for uri in ["/export/excel", "/export/pdf"] {
            let (status, _, body) = request(&app, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(json_body(&body)["error"].as_str().unwrap().starts_with("No data"));
        }
    }

    #[tokio::test]
    async fn empty_store_views_still_succeed() {
        let (_tmp, app) = app(UNREACHABLE_UPSTREAM);

        let (status, _, body) = request(&app, "/chart").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("No data"));

        let (status, _, body) = request(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("No data"));
        assert!(html.contains("/weather-report"));
    }

    #[tokio::test]
    async fn ingest_then_render_everything() {
        let (url, seen) = spawn_upstream(StatusCode::OK, recent_payload()).await;
        let (_tmp, app) = app(&url);

        let (status, _, body) = request(&app, "/weather-report?lat=47.37&lon=8.55").await;
        assert_eq!(status, StatusCode::OK);
        let summary = json_body(&body);
        assert_eq!(summary["status"], "success");
        assert_eq!(summary["rows_stored"], 3);
        assert_eq!(summary["lat"], 47.37);
        assert_eq!(summary["lon"], 8.55);
        assert_eq!(seen.lock().unwrap().len(), 1);

        let (status, _, body) = request(&app, "/chart").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("data:image/svg+xml;base64,"));
        assert!(html.contains("lat 47.37, lon 8.55"));

        let (status, _, body) = request(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("<img"));

        let (status, headers, body) = request(&app, "/export/excel").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], XLSX);
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"weather_last_48h_"));
        assert!(disposition.ends_with(".xlsx\""));
        assert!(body.starts_with(b"PK"));
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(body)).unwrap();
        let sheet = workbook.worksheet_range("last_48h").unwrap();
        let rows: Vec<Vec<Data>> = sheet.rows().map(|row| row.to_vec()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], Data::String("timestamp".into()));
        assert_eq!(rows[1][1], Data::Float(1.5));
        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[3][2], Data::Empty);

        let (status, headers, body) = request(&app, "/export/pdf").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("filename=\"weather_report_"));
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn state_from_settings_creates_database() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::load_from(&tmp.path().join("absent.toml")).unwrap();
        settings.storage.database_path = tmp.path().join("nested").join("weather.db");

        let state = AppState::from_settings(&settings).unwrap();

        assert!(state.store.database_path().exists());
        assert_eq!(state.window_hours, settings.report.window_hours);
    }
}
