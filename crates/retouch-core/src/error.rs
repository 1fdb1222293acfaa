//! Error types module
//!
//! All errors crossing the HTTP boundary are unified under the `AppError`
//! enum. The `ErrorMetadata` trait lets each variant self-describe its
//! response characteristics (status, code, client-facing message) so the API
//! crate can render them without matching on variants.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues like resource limits
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Short variant name used in structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "Storage",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Full message including the source chain, for non-production detail.
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {}", message, source)
            }
            other => other.to_string(),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Storage(_)
            | AppError::ImageProcessing(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::PayloadTooLarge(_) => Some("Reduce the file size and retry"),
            AppError::Storage(_) => Some("Retry the request"),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Internal details stay out of client responses
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An internal error occurred".to_string()
            }
            AppError::Storage(_) => "Storage operation failed".to_string(),
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Internal(_) | AppError::InternalWithSource { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
            AppError::PayloadTooLarge(_) => LogLevel::Warn,
            AppError::Storage(_)
            | AppError::ImageProcessing(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput("bad".to_string()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::NotFound("missing".to_string()).http_status_code(),
            404
        );
        assert_eq!(
            AppError::PayloadTooLarge("big".to_string()).http_status_code(),
            413
        );
        assert_eq!(
            AppError::Storage("disk".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "An internal error occurred");

        let err = AppError::InvalidInput("rotate must be a number".to_string());
        assert!(!err.is_sensitive());
        assert!(err.client_message().contains("rotate"));
    }

    #[test]
    fn test_detailed_message_includes_source() {
        let err = AppError::InternalWithSource {
            message: "transform task".to_string(),
            source: anyhow::anyhow!("join error"),
        };
        let detail = err.detailed_message();
        assert!(detail.contains("transform task"));
        assert!(detail.contains("join error"));
    }
}
