//! API Error Types
//!
//! Defines the uniform error raised by the HTTP client wrapper and the
//! helpers that turn a failed response body into a user-facing message.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the user API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx response
    #[error("{}", status_message(.status, .message))]
    Status {
        status: StatusCode,
        /// Server-supplied `message` field, when the body carried one
        message: Option<String>,
        /// Whether the error body was JSON at all
        json_body: bool,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// Build a status error from a non-success response body
    pub fn from_response(status: StatusCode, content_type: Option<&str>, body: &str) -> Self {
        let parsed = parse_json_body(content_type, body);
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string);

        ApiError::Status {
            status,
            message,
            json_body: parsed.is_some(),
        }
    }

    /// HTTP status code, if the failure came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    /// Classify a reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

/// Generic message keyed to the status when the server gave none
fn status_message(status: &StatusCode, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => format!("Request failed with status {}", status),
    }
}

/// Parse a body as JSON when the content type (or the body itself) says so
pub(crate) fn parse_json_body(content_type: Option<&str>, body: &str) -> Option<serde_json::Value> {
    let declared_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if declared_json || trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed).ok()
    } else {
        None
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
