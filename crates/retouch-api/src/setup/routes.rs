//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use retouch_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Multipart framing overhead allowed on top of the configured file size.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;

    let api = Router::new()
        .route("/api/v0/images", post(handlers::image_upload::upload_image))
        .route(
            "/api/v0/images/{filename}/transform",
            post(handlers::image_transform::transform_image),
        )
        .route(
            "/api/v0/cleanup/{session_id}",
            delete(handlers::sessions::cleanup_session),
        )
        .route("/api/v0/sessions", get(handlers::sessions::list_sessions))
        .route(
            "/api/v0/sessions/{session_id}",
            get(handlers::sessions::get_session),
        )
        .route("/health", get(handlers::health::get_health))
        .route("/api/openapi.json", get(openapi_spec))
        .with_state(state);

    // Server-level concurrency limit against resource exhaustion under load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let body_limit = config.max_file_size_bytes + UPLOAD_OVERHEAD_BYTES;

    let app = api
        // Direct URL access to stored originals
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .merge(Router::from(RapiDoc::new("/api/openapi.json").path("/docs")))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any))
}
