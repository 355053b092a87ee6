//! Web-specific error types
//!
//! Each error maps to the HTTP status and JSON error body the Thingful API
//! would answer with.

use http::StatusCode;
use thingful_api_types::ErrorBody;
use thiserror::Error;

/// Web-specific error type for token and header handling
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        WebError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            WebError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            WebError::Unauthorized { .. } => "UNAUTHORIZED",
            WebError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// The `{"error": ...}` body carrying this error's message
    pub fn to_error_body(&self) -> ErrorBody {
        match self {
            WebError::Unauthorized { message } | WebError::Internal { message } => {
                ErrorBody::new(message.clone())
            }
        }
    }
}
