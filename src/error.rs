use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::scanner::{ExtractionError, PageError, ScanError};

/// The primary error type of the HTTP surface.
///
/// Scanner errors are converted into this at the handler boundary; per-entry
/// failures never reach it.
#[derive(Debug)]
pub enum AppError {
    /// For internal server errors that are not expected to be handled by the client.
    Internal(anyhow::Error),
    /// For client errors due to invalid requests.
    BadRequest(String),
    /// For when a requested resource is not found.
    NotFound(String),
    /// The service process may not read the requested path.
    Forbidden(String),
    /// The scan root is missing or not a directory.
    InvalidRoot { path: String, reason: String },
    /// The client went away and the scan was stopped.
    Cancelled,
    /// For when a client has sent too many requests in a given amount of time.
    RateLimited {
        /// The number of seconds to wait before retrying the request.
        retry_after_seconds: u64,
    },
    /// For when a specific query parameter fails validation.
    ValidationError {
        /// The name of the parameter that failed validation.
        field: String,
        /// A message describing the validation error.
        message: String,
    },
    /// For errors related to I/O operations.
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::InvalidRoot { path, reason } => {
                write!(f, "Invalid directory path '{}': {}", path, reason)
            }
            AppError::Cancelled => write!(f, "Scan cancelled"),
            AppError::RateLimited { retry_after_seconds } => {
                write!(f, "Rate limited. Retry after {} seconds", retry_after_seconds)
            }
            AppError::ValidationError { field, message } => {
                write!(f, "Validation error on field '{}': {}", field, message)
            }
            AppError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!("Internal error {}: {:?}", error_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg, None),
            AppError::InvalidRoot { path, reason } => (
                StatusCode::BAD_REQUEST,
                "INVALID_ROOT",
                "Invalid directory path".to_string(),
                Some(json!({ "path": path, "reason": reason })),
            ),
            // Nobody is listening anymore; the status only shows up in traces
            AppError::Cancelled => {
                (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED", "Scan cancelled".to_string(), None)
            }
            AppError::RateLimited { retry_after_seconds } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Too many requests. Please retry after {} seconds", retry_after_seconds),
                Some(json!({ "retry_after_seconds": retry_after_seconds })),
            ),
            AppError::ValidationError { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Validation failed for field '{}'", field),
                Some(json!({ "field": field, "message": message })),
            ),
            AppError::IoError(msg) => {
                tracing::error!("I/O error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "An I/O error occurred".to_string(),
                    Some(json!({ "details": msg })),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": error_message,
            },
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["error"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(format!("{}: {}", err.kind(), err))
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidRoot { path, reason } => AppError::InvalidRoot { path, reason },
            ScanError::InvalidExclude(e) => {
                AppError::Internal(anyhow::anyhow!("invalid exclude pattern in configuration: {}", e))
            }
            ScanError::Cancelled => AppError::Cancelled,
        }
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::ValidationError { field: err.field().to_string(), message: err.to_string() }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        let path = err.path().display().to_string();
        match err {
            ExtractionError::NotFound { .. } => AppError::NotFound(format!("File not found: {}", path)),
            ExtractionError::PermissionDenied { .. } => {
                AppError::Forbidden(format!("Permission denied: {}", path))
            }
            ExtractionError::Unsupported { .. } => {
                AppError::BadRequest(format!("Not a regular file or symlink: {}", path))
            }
            ExtractionError::Io { source, .. } => AppError::from(source),
        }
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// Helpers for validating query parameters before any filesystem work starts.
pub mod validation {
    use super::*;

    const MAX_PATH_LENGTH: usize = 4096;
    const MAX_EXTENSION_LENGTH: usize = 32;

    /// Validates a path parameter: not empty, no null characters, bounded length.
    pub fn validate_path(path: &str, field: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return Err(AppError::ValidationError {
                field: field.to_string(),
                message: "Path cannot be empty".to_string(),
            });
        }

        if path.contains('\0') {
            return Err(AppError::ValidationError {
                field: field.to_string(),
                message: "Path contains null characters".to_string(),
            });
        }

        if path.len() > MAX_PATH_LENGTH {
            return Err(AppError::ValidationError {
                field: field.to_string(),
                message: format!("Path exceeds maximum length of {} characters", MAX_PATH_LENGTH),
            });
        }

        Ok(())
    }

    /// Validates an extension filter such as `.py` or `txt`.
    pub fn validate_extension(ext: &str) -> AppResult<()> {
        let invalid = |message: String| AppError::ValidationError { field: "extension".to_string(), message };
        if ext.len() > MAX_EXTENSION_LENGTH {
            return Err(invalid(format!("Extension exceeds maximum length of {}", MAX_EXTENSION_LENGTH)));
        }
        if ext.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
            return Err(invalid("Extension must not contain path separators".to_string()));
        }
        Ok(())
    }
}
