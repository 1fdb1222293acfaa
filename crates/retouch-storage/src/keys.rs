//! Storage key generation.
//!
//! Uploaded files are stored flat under the upload directory as
//! `{epoch_millis}_{sanitized_original_name}`, matching the public filename
//! clients use on the transform route.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Reduce a client-supplied filename to a safe flat name: the final path
/// component only, with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn sanitize_filename(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ".." would survive the character filter
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Generate the storage key for a new upload.
pub fn generate_storage_key(original: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}_{}", millis, sanitize_filename(original))
}
