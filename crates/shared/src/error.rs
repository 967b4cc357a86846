use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the cart service on non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Best-effort decode of a response body; falls back to the trimmed raw text.
    pub fn from_body(body: &str) -> Option<Self> {
        if let Ok(parsed) = serde_json::from_str::<ApiError>(body) {
            return Some(parsed);
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }
}
