//! Application initialization: storage, registry, cleanup scheduler, routes.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use retouch_core::Config;
use retouch_processing::MediaValidator;
use retouch_sessions::{CleanupConfig, CleanupService, SessionRegistry};
use retouch_storage::LocalStorage;
use std::sync::Arc;

/// Build the application state and router, and start the background
/// cleanup task. The registry starts empty on every boot; nothing about
/// sessions survives a restart.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let storage = Arc::new(
        LocalStorage::new(
            config.upload_dir.clone(),
            format!("{}/uploads", config.base_url),
        )
        .await?,
    );

    let registry = Arc::new(SessionRegistry::new());

    let cleanup = Arc::new(CleanupService::new(
        Arc::clone(&registry),
        storage.clone(),
        CleanupConfig {
            max_idle: config.session_max_idle,
            sweep_interval: config.cleanup_interval,
            orphan_max_age: config.orphan_max_age,
            orphan_sweep_enabled: config.orphan_sweep_enabled,
        },
    ));

    let validator = MediaValidator::new(
        config.max_file_size_bytes,
        config.allowed_extensions.clone(),
        config.allowed_content_types.clone(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        registry,
        cleanup: Arc::clone(&cleanup),
        validator,
    });

    // Fire-and-forget: the sweep task lives for the whole process
    let _sweeper = cleanup.start();
    tracing::info!(
        max_idle_secs = config.session_max_idle.as_secs(),
        sweep_interval_secs = config.cleanup_interval.as_secs(),
        orphan_sweep_enabled = config.orphan_sweep_enabled,
        "Cleanup scheduler started"
    );

    let router = routes::setup_routes(&config, Arc::clone(&state))?;

    Ok((state, router))
}
