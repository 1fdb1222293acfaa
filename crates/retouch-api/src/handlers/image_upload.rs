use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use retouch_core::models::{StoredFile, UploadResponse};
use retouch_core::AppError;
use retouch_storage::generate_storage_key;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const SESSION_HEADER: &str = "x-session-id";

struct UploadedPart {
    original_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Upload image handler
///
/// Accepts a multipart form with a `file` part and a session identifier
/// (form field `session_id` or the `X-Session-Id` header), persists the
/// bytes to the upload directory, and registers the file under the session
/// for later cleanup.
#[utoipa::path(
    post,
    path = "/api/v0/images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file or session identifier", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let mut file: Option<UploadedPart> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(|n| n.to_string())
                    .ok_or_else(|| AppError::InvalidInput("Missing file name".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .ok_or_else(|| AppError::InvalidInput("Missing content type".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();

                file = Some(UploadedPart {
                    original_name,
                    content_type,
                    data,
                });
            }
            Some("session_id") | Some("sessionId") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read session id: {}", e))
                })?;
                session_id = Some(value);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;
    if file.data.is_empty() {
        return Err(AppError::InvalidInput("File buffer is empty".to_string()).into());
    }

    // Form field wins; the header is the fallback for clients that
    // stream the file as the only part
    let session_id = session_id
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            headers
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        })
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing session identifier".to_string()))?;

    state
        .validator
        .validate(&file.original_name, &file.content_type, file.data.len())?;

    let filename = generate_storage_key(&file.original_name);
    let size_bytes = file.data.len();

    let url = state
        .storage
        .upload(&filename, &file.content_type, file.data)
        .await?;

    let stored = StoredFile {
        filename: filename.clone(),
        session_id: session_id.clone(),
        content_type: file.content_type,
        size_bytes,
        url,
        uploaded_at: Utc::now(),
    };

    state.registry.register_file(&session_id, stored.clone());

    tracing::info!(
        filename = %filename,
        session_id = %session_id,
        size_bytes = size_bytes,
        "Image uploaded"
    );

    Ok((StatusCode::CREATED, Json(UploadResponse::from(stored))))
}
