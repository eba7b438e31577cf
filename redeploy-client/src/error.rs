//! Error types for the orchestrator client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the task-orchestration API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("{operation} failed (status {status}): {message}")]
    ApiError {
        /// Operation that was invoked
        operation: String,
        /// HTTP status code
        status: u16,
        /// Service error type (e.g. "ClusterNotFoundException")
        error_type: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(
        operation: impl Into<String>,
        status: u16,
        error_type: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ApiError {
            operation: operation.into(),
            status,
            error_type,
            message: message.into(),
        }
    }

    /// Check if this error reports a missing cluster or task
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ApiError {
                status: 404, ..
            } => true,
            Self::ApiError {
                error_type: Some(kind),
                ..
            } => kind.ends_with("NotFoundException"),
            _ => false,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
