use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use retouch_core::models::{CleanupResponse, SessionInfoResponse, SessionsCountResponse};
use retouch_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Explicit session cleanup.
///
/// Always succeeds, even when the session was already cleaned or never
/// existed - the client is saying "I am done with these files", and that is
/// true either way.
#[utoipa::path(
    delete,
    path = "/api/v0/cleanup/{session_id}",
    tag = "sessions",
    params(("session_id" = String, Path, description = "Client session identifier")),
    responses((status = 200, description = "Cleanup performed", body = CleanupResponse))
)]
#[tracing::instrument(skip_all, fields(session_id = %session_id, operation = "cleanup_session"))]
pub async fn cleanup_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<CleanupResponse> {
    let files_deleted = state.cleanup.cleanup_session(&session_id).await;

    Json(CleanupResponse {
        session_id,
        files_deleted,
    })
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions/{session_id}",
    tag = "sessions",
    params(("session_id" = String, Path, description = "Client session identifier")),
    responses(
        (status = 200, description = "Session info", body = SessionInfoResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfoResponse>, HttpAppError> {
    let info = state
        .registry
        .session_info(&session_id)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let idle_secs = Instant::now()
        .duration_since(info.last_activity)
        .as_secs();

    Ok(Json(SessionInfoResponse {
        session_id: info.session_id,
        file_count: info.files.len(),
        files: info.files,
        idle_secs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions",
    tag = "sessions",
    responses((status = 200, description = "Active session count", body = SessionsCountResponse))
)]
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsCountResponse> {
    Json(SessionsCountResponse {
        active_sessions: state.registry.active_session_count(),
    })
}
