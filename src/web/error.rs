use crate::error::WeatherReportError;
use crate::report::error::ReportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl WeatherReportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherReportError::Validation(_) => StatusCode::BAD_REQUEST,
            WeatherReportError::Ingest(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            WeatherReportError::Ingest(e) if e.is_parse() => StatusCode::UNPROCESSABLE_ENTITY,
            WeatherReportError::Report(ReportError::NoData) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The chain of underlying causes, joined with `": "`.
    fn details(&self) -> Option<String> {
        let mut causes = Vec::new();
        let mut source = self.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        (!causes.is_empty()).then(|| causes.join(": "))
    }
}

impl IntoResponse for WeatherReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        if status.is_server_error() {
            error!("{} {}: {:?}", status.as_u16(), body.error, body.details);
        } else {
            warn!("{} {}", status.as_u16(), body.error);
        }
        (status, Json(body)).into_response()
    }
}
