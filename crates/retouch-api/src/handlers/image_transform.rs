use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use retouch_core::models::RawTransformations;
use retouch_core::AppError;
use retouch_processing::ImageTransformer;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TransformRequest {
    #[serde(default)]
    pub transformations: RawTransformations,
}

/// Transform image handler
///
/// Re-reads the stored original from disk on every request (transform
/// output is never cached) and streams back the transformed bytes.
#[utoipa::path(
    post,
    path = "/api/v0/images/{filename}/transform",
    tag = "images",
    params(
        ("filename" = String, Path, description = "Stored filename returned by the upload endpoint")
    ),
    request_body = TransformRequest,
    responses(
        (status = 200, description = "Transformed image", content_type = "image/*"),
        (status = 400, description = "Invalid transformation parameters", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(filename = %filename, operation = "transform_image"))]
pub async fn transform_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    ValidatedJson(request): ValidatedJson<TransformRequest>,
) -> Result<Response, HttpAppError> {
    let file = state
        .registry
        .lookup_file(&filename)
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    let original = state.storage.download(&file.filename).await.map_err(|e| {
        tracing::error!(error = %e, filename = %file.filename, "Failed to read original from storage");
        HttpAppError::from(e)
    })?;

    let raw = request.transformations;

    // Pixel work is CPU-bound; keep it off the async workers
    let (transformed, content_type) =
        tokio::task::spawn_blocking(move || ImageTransformer::transform(&original, &raw))
            .await
            .map_err(|e| AppError::InternalWithSource {
                message: "Transform task failed".to_string(),
                source: e.into(),
            })?
            .map_err(HttpAppError::from)?;

    tracing::debug!(
        filename = %filename,
        output_bytes = transformed.len(),
        content_type = %content_type,
        "Image transformed"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, transformed.len())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(transformed))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
