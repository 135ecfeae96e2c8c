//! The error shape every backend call reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when neither the response body nor the transport gives one.
pub const REQUEST_FAILED: &str = "Request failed";

/// Uniform shape of every failed backend call.
///
/// `status` is `None` when no response reached the client (network failure,
/// aborted request, unreadable body).
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human readable reason, taken from the body when the server sent one.
    pub message: String,
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// Raw response body, if it was JSON.
    pub body: Option<Value>,
}

impl ApiError {
    /// A failure that never produced an HTTP response.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                REQUEST_FAILED.to_string()
            } else {
                message
            },
            status: None,
            body: None,
        }
    }

    /// Build the error for a non-success response.
    ///
    /// The message is the body's `message` field, then its `error` field,
    /// then `fallback`, then [`REQUEST_FAILED`].
    #[must_use]
    pub fn from_response(status: u16, body: Option<Value>, fallback: Option<&str>) -> Self {
        let from_body = body.as_ref().and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str))
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        });
        let message = from_body
            .or_else(|| fallback.filter(|text| !text.is_empty()).map(str::to_string))
            .unwrap_or_else(|| REQUEST_FAILED.to_string());
        Self {
            message,
            status: Some(status),
            body,
        }
    }

    /// `true` for 401 and 403: the session is no longer valid.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    /// `true` when the request never got an HTTP response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_body_message() {
        let error = ApiError::from_response(
            400,
            Some(json!({ "message": "Room is full", "error": "Bad Request" })),
            Some("status 400"),
        );
        assert_eq!(error.message, "Room is full");
        assert_eq!(error.status, Some(400));
    }

    #[test]
    fn message_falls_back_to_error_field() {
        let error = ApiError::from_response(404, Some(json!({ "error": "Not Found" })), None);
        assert_eq!(error.to_string(), "Not Found");
    }

    #[test]
    fn message_falls_back_to_generic_text() {
        let error = ApiError::from_response(500, None, None);
        assert_eq!(error.message, REQUEST_FAILED);
        assert!(!error.is_auth_failure());
    }

    #[test]
    fn auth_failures_are_401_and_403() {
        assert!(ApiError::from_response(401, None, None).is_auth_failure());
        assert!(ApiError::from_response(403, None, None).is_auth_failure());
        assert!(!ApiError::from_response(419, None, None).is_auth_failure());
        assert!(!ApiError::transport("offline").is_auth_failure());
    }

    #[test]
    fn transport_error_has_no_status() {
        let error = ApiError::transport("");
        assert!(error.is_transport());
        assert_eq!(error.message, REQUEST_FAILED);
    }
}
