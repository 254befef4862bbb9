//! Error type for calls against the Drive and Sheets APIs.

use std::fmt;

use serde::Deserialize;

/// Errors raised while delegating to the remote document service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The API answered with a non-success status.
    ///
    /// `message` is taken from the structured `error.message` field of the
    /// Google error body when present, the raw body otherwise.
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    Transport(String),

    /// The response body could not be decoded into the expected shape.
    Decode(String),

    /// Anything else, carried as plain text.
    Other(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { status, message } => write!(f, "Google API error ({}): {}", status, message),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Decode(msg) => write!(f, "Invalid response from Google API: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ServiceError {
    /// Build an `Api` error from a failed response's status and body.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let structured = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .filter(|m| !m.is_empty());

        let message = match structured {
            Some(message) => message,
            None if body.trim().is_empty() => format!("request failed with status {}", status),
            None => body.trim().to_string(),
        };

        Self::Api { status, message }
    }

    /// The human-readable diagnostic for this fault.
    ///
    /// Structured API faults yield the service's own message; every other
    /// variant falls back to its display form.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
