//! Application state shared by all handlers.

use retouch_core::Config;
use retouch_processing::MediaValidator;
use retouch_sessions::{CleanupService, SessionRegistry};
use retouch_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub registry: Arc<SessionRegistry>,
    pub cleanup: Arc<CleanupService>,
    pub validator: MediaValidator,
}
