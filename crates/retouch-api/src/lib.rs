//! Retouch API Library
//!
//! HTTP handlers, middleware layers, and application setup for the
//! session-scoped image upload and transformation service.

mod api_doc;

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;
