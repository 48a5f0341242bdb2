//! Standardized API response envelope.

use serde::{Deserialize, Serialize};

/// Error code for a repeated curation request. Clients branch on this
/// to distinguish "already exists" from "request failed".
pub const RESOURCE_EXISTS: &str = "RESOURCE_EXISTS";

/// Fixed rejection message for the global rate limiter.
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Error envelope: `{ success: false, error: <code or message>, message? }`.
///
/// For machine-distinguishable failures `error` carries a stable code and
/// `message` the human-readable text; for everything else `error` is the
/// text itself and `message` is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn resource_exists(message: impl Into<String>) -> Self {
        Self::new(RESOURCE_EXISTS).with_message(message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    pub fn internal_error() -> Self {
        Self::new("Something went wrong!")
    }

    pub fn upstream_error() -> Self {
        Self::new("AI provider request failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_exists_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::resource_exists(
            "Resources for this subject already exist",
        ))
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "RESOURCE_EXISTS");
        assert!(body["message"].is_string());
    }

    #[test]
    fn generic_error_omits_message_field() {
        let body = serde_json::to_value(ErrorResponse::internal_error()).unwrap();
        assert_eq!(body["success"], false);
        assert!(body.get("message").is_none());
    }
}
