//! Gemini API client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, AssistantError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse};
use super::{GenerationRequest, TextGenerator};

/// Gemini API client.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::InvalidConfig` if the API key cannot be sent
    /// as a header, or `AssistantError::Http` if the HTTP client cannot be
    /// built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AssistantError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| AssistantError::InvalidConfig("API key is not a valid header value".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                endpoint: format!("{}/models/{}:generateContent", config.base_url, config.model),
            }),
        })
    }

    /// Generate text for a single prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error
    /// status, or the body cannot be parsed.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate_content(&self, request: GenerationRequest) -> Result<String, AssistantError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(request.prompt)],
            system_instruction: request.system_instruction.map(Content::instruction),
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?;

        let parsed = self.handle_response(response).await?;
        let text = parsed.text();
        if text.is_empty() {
            tracing::warn!(finish_reason = parsed.finish_reason(), "generation returned no text");
        }
        Ok(text)
    }

    /// Handle a response, successful or not.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, AssistantError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AssistantError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AssistantError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return AssistantError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return AssistantError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |api_error| api_error.error.describe());
                AssistantError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => AssistantError::Http(e),
        }
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AssistantError> {
        self.generate_content(request).await
    }
}
