//! JSON error bodies for the upload server.

use serde::{Deserialize, Serialize};

use super::http::Response;

/// Stable error codes returned in JSON error bodies.
pub mod error_codes {
    /// Request could not be parsed, or the upload was unusable.
    pub const BAD_REQUEST: &str = "SERVER_001";
    /// Static file not found.
    pub const NOT_FOUND: &str = "SERVER_002";
    /// Method not supported for the path.
    pub const METHOD_NOT_ALLOWED: &str = "SERVER_003";
    /// Request head or body over its limit.
    pub const PAYLOAD_TOO_LARGE: &str = "SERVER_004";
    /// Hashing or rendering the upload failed.
    pub const RENDER_FAILED: &str = "SERVER_005";
    /// Any other server-side failure.
    pub const INTERNAL: &str = "SERVER_006";
}

/// A structured error in a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// Stable error code (e.g., "SERVER_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Whether the request succeeded (always false for errors).
    pub success: bool,
    /// Error details.
    pub errors: Vec<ApiError>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![ApiError {
                code: code.to_string(),
                message: message.into(),
            }],
        }
    }

    /// Serializes the body, falling back to a fixed document.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"errors":[{"code":"SERVER_006","message":"Failed to serialize error"}]}"#
                .to_string()
        })
    }

    /// Wraps the body in a response with `status`.
    pub fn into_response(self, status: u16) -> Response {
        Response::new(status, "application/json", self.to_json().into_bytes())
    }
}

/// Shorthand for a single-error JSON response.
pub fn error_response(status: u16, code: &str, message: impl Into<String>) -> Response {
    ErrorResponse::new(code, message).into_response(status)
}
