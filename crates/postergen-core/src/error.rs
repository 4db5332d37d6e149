use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the poster backend client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx status from the backend. The message comes from the error
    /// body when one is present, otherwise a fixed fallback.
    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },
    /// Response parsed as JSON but violates the expected envelope shape.
    #[error("{0}")]
    Format(String),
    /// Malformed JSON in a response body or an embedded serialized field.
    #[error("malformed JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The resolved message for an API failure, if this is one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
