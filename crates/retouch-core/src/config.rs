//! Configuration module
//!
//! Environment-driven configuration for the API and background services.
//! Every knob has a default so the server boots with no environment at all;
//! a `.env` file is honored when present.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_MAX_IDLE_SECS: u64 = 3600;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
const DEFAULT_ORPHAN_MAX_AGE_SECS: u64 = 3600;

const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Base URL used when constructing public links to stored files.
    pub base_url: String,
    /// Directory holding uploaded originals. Created at startup if missing.
    pub upload_dir: String,
    pub cors_origins: Vec<String>,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    /// Sessions idle longer than this are evicted by the periodic sweep.
    pub session_max_idle: Duration,
    /// Interval between background sweep runs.
    pub cleanup_interval: Duration,
    /// Files in the upload directory older than this are deleted by the
    /// orphan sweep even when no session tracks them.
    pub orphan_max_age: Duration,
    pub orphan_sweep_enabled: bool,
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            cors_origins: env_list("CORS_ORIGINS", &["*"]),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES)?,
            allowed_extensions: env_list("ALLOWED_EXTENSIONS", DEFAULT_ALLOWED_EXTENSIONS),
            allowed_content_types: env_list("ALLOWED_CONTENT_TYPES", DEFAULT_ALLOWED_CONTENT_TYPES),
            session_max_idle: Duration::from_secs(env_parse(
                "SESSION_MAX_IDLE_SECS",
                DEFAULT_SESSION_MAX_IDLE_SECS,
            )?),
            cleanup_interval: Duration::from_secs(env_parse(
                "CLEANUP_INTERVAL_SECS",
                DEFAULT_CLEANUP_INTERVAL_SECS,
            )?),
            orphan_max_age: Duration::from_secs(env_parse(
                "ORPHAN_MAX_AGE_SECS",
                DEFAULT_ORPHAN_MAX_AGE_SECS,
            )?),
            orphan_sweep_enabled: env_parse("ORPHAN_SWEEP_ENABLED", true)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Public URL for a stored file, served from the static upload mount.
    pub fn public_upload_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.base_url, filename)
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(e) => bail!("Invalid value for {}: {} ({})", key, raw, e),
        },
        Err(_) => Ok(default),
    }
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_upload_url() {
        let config = Config {
            server_port: 3000,
            base_url: "http://localhost:3000".to_string(),
            upload_dir: "uploads".to_string(),
            cors_origins: vec!["*".to_string()],
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_extensions: vec!["png".to_string()],
            allowed_content_types: vec!["image/png".to_string()],
            session_max_idle: Duration::from_secs(3600),
            cleanup_interval: Duration::from_secs(300),
            orphan_max_age: Duration::from_secs(3600),
            orphan_sweep_enabled: true,
            environment: "development".to_string(),
        };

        assert_eq!(
            config.public_upload_url("123_cat.png"),
            "http://localhost:3000/uploads/123_cat.png"
        );
        assert!(!config.is_production());
    }

    #[test]
    fn test_env_list_parsing() {
        std::env::set_var("RETOUCH_TEST_LIST", "jpg, png ,,webp");
        let parsed = env_list("RETOUCH_TEST_LIST", &["gif"]);
        assert_eq!(parsed, vec!["jpg", "png", "webp"]);
        std::env::remove_var("RETOUCH_TEST_LIST");

        let defaulted = env_list("RETOUCH_TEST_LIST_MISSING", &["gif"]);
        assert_eq!(defaulted, vec!["gif"]);
    }
}
