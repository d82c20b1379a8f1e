//! Error types for the compile service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Compile service errors
#[derive(Debug, Error)]
pub enum Error {
    /// No file part in the multipart form
    #[error("No file part")]
    MissingFile,

    /// File part present but the filename is empty
    #[error("No selected file")]
    EmptyFilename,

    /// Extension is not one of the allowed source types
    #[error("Invalid file type or size")]
    InvalidFileType,

    /// Transform option is not in the allowed set
    #[error("Invalid option")]
    InvalidOption,

    /// Request body exceeds the configured size cap
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Compiler exited non-zero, timed out, or could not be spawned
    #[error("Compilation failed")]
    CompilationFailed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Multipart decoding error
    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::MissingFile | Error::EmptyFilename => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::InvalidFileType | Error::InvalidOption => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            Error::CompilationFailed => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Error::Config(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Multipart(err) => (err.status(), "Failed to read request body".to_string()),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}
