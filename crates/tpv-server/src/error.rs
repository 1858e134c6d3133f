//! Error types for the HTTP server.
//!
//! Bodies are short plain-text messages. Rejected paths never reveal which
//! check refused them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tpv_path::PathError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Requested path was refused by the resolver.
    #[error("Invalid path: {}", .0.reason())]
    InvalidPath(#[from] PathError),

    /// Nothing exists at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request named no template.
    #[error("No template specified")]
    NoTemplate,

    /// Path names a directory where a file is required.
    #[error("Is a directory: {0}")]
    IsDirectory(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidPath(_) => (StatusCode::BAD_REQUEST, "Invalid path"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Template not found"),
            Self::NoTemplate => (StatusCode::BAD_REQUEST, "No template specified"),
            Self::IsDirectory(_) => (StatusCode::BAD_REQUEST, "Cannot view directory content"),
            Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read template"),
            Self::Worker(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render template"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::InvalidPath(PathError::TraversalDetected), StatusCode::BAD_REQUEST),
            (ServerError::NotFound("x.html".to_owned()), StatusCode::NOT_FOUND),
            (ServerError::NoTemplate, StatusCode::BAD_REQUEST),
            (ServerError::IsDirectory("dir".to_owned()), StatusCode::BAD_REQUEST),
            (ServerError::Io(std::io::Error::other("disk")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_path_display_carries_reason() {
        let error = ServerError::InvalidPath(PathError::UncPathRejected);
        assert_eq!(error.to_string(), "Invalid path: unc_path");
    }
}
