use crate::error::WeatherReportError;
use crate::ingest::ReportSummary;
use crate::report::html::{render_chart_page, render_index_page, render_no_data_page};
use crate::report::pdf::render_pdf;
use crate::report::spreadsheet::render_spreadsheet;
use crate::types::observation::LatLon;
use crate::web::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use log::info;
use serde::Deserialize;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Coordinates are taken as raw strings so presence and numeric validity can
/// be reported separately.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// GET /: chart of the current window, or a placeholder.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, WeatherReportError> {
    let rows = state.store.query_recent_async(state.window_hours).await?;
    let page = tokio::task::spawn_blocking(move || render_index_page(&rows)).await??;
    Ok(Html(page))
}

/// GET /chart. An empty window is a page saying so, not an error.
pub async fn chart(State(state): State<AppState>) -> Result<Html<String>, WeatherReportError> {
    let rows = state.store.query_recent_async(state.window_hours).await?;
    if rows.is_empty() {
        return Ok(Html(render_no_data_page()));
    }
    let page = tokio::task::spawn_blocking(move || render_chart_page(&rows)).await??;
    Ok(Html(page))
}

/// GET /weather-report?lat=&lon=
pub async fn weather_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportSummary>, WeatherReportError> {
    let lat = parse_coordinate("lat", query.lat.as_deref(), 90.0)?;
    let lon = parse_coordinate("lon", query.lon.as_deref(), 180.0)?;
    let summary = state.ingestor.run_report(LatLon(lat, lon)).await?;
    Ok(Json(summary))
}

/// GET /export/excel
pub async fn export_excel(State(state): State<AppState>) -> Result<Response, WeatherReportError> {
    let rows = state.store.query_recent_async(state.window_hours).await?;
    let bytes = tokio::task::spawn_blocking(move || render_spreadsheet(&rows)).await??;
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, "weather_last_48h", "xlsx"))
}

/// GET /export/pdf
pub async fn export_pdf(State(state): State<AppState>) -> Result<Response, WeatherReportError> {
    let rows = state.store.query_recent_async(state.window_hours).await?;
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&rows)).await??;
    Ok(attachment(bytes, PDF_CONTENT_TYPE, "weather_report", "pdf"))
}

/// A required, finite coordinate within `±limit`. `0` is a valid value.
fn parse_coordinate(name: &str, raw: Option<&str>, limit: f64) -> Result<f64, WeatherReportError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            WeatherReportError::Validation(format!("Missing required query parameter '{name}'"))
        })?;
    let value: f64 = raw.parse().map_err(|_| {
        WeatherReportError::Validation(format!("Query parameter '{name}' must be a number, got '{raw}'"))
    })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(WeatherReportError::Validation(format!(
            "Query parameter '{name}' must be between -{limit} and {limit}, got '{raw}'"
        )));
    }
    Ok(value)
}

fn attachment(bytes: Vec<u8>, content_type: &str, stem: &str, extension: &str) -> Response {
    let filename = format!("{stem}_{}.{extension}", Utc::now().format("%Y%m%dT%H%M%SZ"));
    info!("Serving {} ({} bytes)", filename, bytes.len());
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
