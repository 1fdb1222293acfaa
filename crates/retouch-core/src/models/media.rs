use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Metadata for a file persisted in the upload directory.
///
/// The storage key doubles as the public filename
/// (`{epoch_millis}_{sanitized_original_name}`). Tracked only in memory;
/// a process restart loses the association and the orphan sweep reclaims
/// the bytes on disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub session_id: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Response body for a successful upload (201 Created).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
    pub filename: String,
    pub session_id: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<StoredFile> for UploadResponse {
    fn from(file: StoredFile) -> Self {
        UploadResponse {
            image_url: file.url,
            filename: file.filename,
            session_id: file.session_id,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// Response body for an explicit session cleanup. Returned even when the
/// session was already gone (cleanup is idempotent).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub session_id: String,
    pub files_deleted: usize,
}

/// Read-only session introspection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfoResponse {
    pub session_id: String,
    pub files: Vec<String>,
    pub file_count: usize,
    pub idle_secs: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionsCountResponse {
    pub active_sessions: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}
