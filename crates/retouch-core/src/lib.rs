//! Core types shared across the retouch workspace: configuration, the
//! unified error type, and wire models.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
