use super::error::{ApiError, ApiResult};
use super::AppState;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use knit_config::validate_session_id;
use knit_core::{AnalysisResult, FileReport};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Multipart field holding the upload.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Key for `GET /api/dependencies/{session_id}`; null when the upload
    /// could not be processed
    pub session_id: Option<Uuid>,
    pub result: AnalysisResult,
}

pub async fn health() -> &'static str {
    "OK"
}

/// Reads the bytes of the `file` field, skipping any other fields.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(ApiError::BadRequest(format!(
        "multipart field '{}' is required",
        FILE_FIELD
    )))
}

pub async fn upload_project(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let bytes = read_file_field(&mut multipart).await?;
    info!(bytes = bytes.len(), "project uploaded");

    let backend = state.backend.clone();
    let outcome = tokio::task::spawn_blocking(move || backend.try_analyze_archive(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))?;

    match outcome {
        Ok(result) => {
            let session_id = state.sessions.insert(result.clone());
            info!(%session_id, nodes = result.nodes.len(), "project analyzed");
            Ok((
                StatusCode::OK,
                Json(UploadResponse {
                    session_id: Some(session_id),
                    result,
                }),
            ))
        }
        Err(e) => {
            warn!(error = %e, "failed to process project");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadResponse {
                    session_id: None,
                    result: AnalysisResult::failed(format!("Failed to process project: {}", e)),
                }),
            ))
        }
    }
}

pub async fn get_dependencies(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<AnalysisResult>> {
    validate_session_id(&session_id)?;
    let id = Uuid::parse_str(&session_id)
        .map_err(|e| ApiError::BadRequest(format!("invalid session id: {}", e)))?;

    state
        .sessions
        .get(&id)
        .map(|stored| Json(stored.result))
        .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))
}

pub async fn analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<FileReport>> {
    let bytes = read_file_field(&mut multipart).await?;
    let contents = String::from_utf8_lossy(&bytes);
    Ok(Json(state.backend.inspect(&contents)))
}
