//! API types: transport-neutral payloads, credentials, and errors.

use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API client and auth operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("{message}")]
    Status { status: u16, message: String, details: Payload },

    /// The login payload carried no token, session id, or success evidence.
    #[error("{0}")]
    MissingSession(String),

    /// The record payload did not contain a user object.
    #[error("User not found.")]
    NotFound,

    /// A configured or derived URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    Client(String),
}

impl ApiError {
    /// HTTP status carried by the error, when the backend produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// A parsed response body: JSON when the server declared a JSON content type,
/// raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// View the payload as a JSON value. Text bodies become JSON strings so the
    /// normalizers can treat every payload uniformly.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Human-readable failure message for a non-success response.
    pub(crate) fn error_message(&self) -> String {
        match self {
            Self::Json(value) => match value.get("message") {
                Some(Value::String(message)) if !message.is_empty() => message.clone(),
                Some(Value::Null | Value::Bool(false)) | None => match value {
                    Value::String(text) if !text.is_empty() => text.clone(),
                    _ => "Request failed".to_owned(),
                },
                Some(_) => "Request failed".to_owned(),
            },
            Self::Text(text) => text.clone(),
        }
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Auth material attached to protected requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub session_id: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.session_id.is_none()
    }
}
