//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::handlers::image_transform::TransformRequest;
use retouch_core::models::{
    CleanupResponse, HealthResponse, RawCompress, RawCrop, RawResize, RawTransformations,
    SessionInfoResponse, SessionsCountResponse, UploadResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retouch API",
        version = "0.1.0",
        description = "Session-scoped image upload and transformation service. Uploaded originals live in a flat upload directory, are grouped per client session for cleanup, and can be transformed (crop, resize, rotate, flip, blur, compress, grayscale, negate, sharpen, tint) on demand."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::image_transform::transform_image,
        handlers::sessions::cleanup_session,
        handlers::sessions::get_session,
        handlers::sessions::list_sessions,
        handlers::health::get_health,
    ),
    components(schemas(
        ErrorResponse,
        UploadResponse,
        CleanupResponse,
        SessionInfoResponse,
        SessionsCountResponse,
        HealthResponse,
        TransformRequest,
        RawTransformations,
        RawCrop,
        RawResize,
        RawCompress,
    )),
    tags(
        (name = "images", description = "Upload and transform images"),
        (name = "sessions", description = "Session file tracking and cleanup"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_includes_routes() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).expect("serialize spec");
        let paths = json.get("paths").expect("paths present");
        assert!(paths.get("/api/v0/images").is_some());
        assert!(paths.get("/api/v0/images/{filename}/transform").is_some());
        assert!(paths.get("/api/v0/cleanup/{session_id}").is_some());
    }
}
