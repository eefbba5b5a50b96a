use super::upload::read_image_upload;
use super::AppState;
use crate::error::{AnalysisError, UploadRejection};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde_json::Value;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Analyze an uploaded image.
///
/// Responds 200 with the model's vibe JSON, 400 for a bad upload or a safety
/// refusal, and 500 when the model or its output fails.
#[tracing::instrument(
    skip(state, multipart),
    fields(request_id = %uuid::Uuid::new_v4(), operation = "analyze")
)]
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AnalysisError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!("Request is not multipart: {}", rejection);
        UploadRejection::NoImage
    })?;

    let upload = read_image_upload(multipart).await?;
    let file_name = upload.file_name.clone();

    let vibe = state.analyzer.analyze(upload).await?;

    tracing::info!(file_name = %file_name, "Vibe analysis succeeded");
    Ok(Json(vibe))
}
