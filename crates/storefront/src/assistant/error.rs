//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when generating text.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key is configured.
    #[error("API key missing")]
    MissingApiKey,

    /// The client could not be built from the configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini API returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// API error response from Gemini.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message.
    pub message: String,
    /// Canonical status name (e.g., `INVALID_ARGUMENT`).
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiError {
    /// The message, prefixed with the status name when there is one.
    #[must_use]
    pub fn describe(self) -> String {
        match self.status {
            Some(status) => format!("{status}: {}", self.message),
            None => self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_error_display() {
        let err = AssistantError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = AssistantError::Api {
            status: 400,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400): API key not valid");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.status.as_deref(), Some("INVALID_ARGUMENT"));
        assert_eq!(
            response.error.describe(),
            "INVALID_ARGUMENT: API key not valid. Please pass a valid API key."
        );
    }

    #[test]
    fn test_api_error_without_status() {
        let response: ApiErrorResponse =
            serde_json::from_str(r#"{"error": {"message": "backend down"}}"#).expect("deserialize");
        assert_eq!(response.error.describe(), "backend down");
    }
}
