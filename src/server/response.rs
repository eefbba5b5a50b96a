//! HTTP rendering of analysis errors.

use crate::error::AnalysisError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every non-200 response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

fn log_error(error: &AnalysisError) {
    let kind = error.kind();
    match error {
        AnalysisError::Validation(_) | AnalysisError::SafetyRefusal(_) => {
            tracing::warn!(error = %error, kind, "Analysis rejected");
        }
        AnalysisError::Service(_) | AnalysisError::Processing(_) => {
            tracing::error!(error = %error, kind, "Analysis failed");
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        log_error(&self);

        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(ErrorResponse {
            error: self.client_message().to_string(),
        });

        (status, body).into_response()
    }
}
