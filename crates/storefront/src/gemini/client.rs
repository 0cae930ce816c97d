//! Gemini API client for content generation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini API client.
///
/// Cheap to clone; every clone shares one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key contains invalid header characters or
    /// the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| GeminiError::InvalidApiKey(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let model = config.model.trim_start_matches("models/").to_string();
        let endpoint = format!(
            "{}/models/{model}:generateContent",
            config.api_base.trim_end_matches('/')
        );

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model,
                endpoint,
            }),
        })
    }

    /// Model name without the `models/` prefix.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a `generateContent` request and return the parsed response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, or the body cannot be parsed.
    #[instrument(skip(self, request), fields(model = %self.inner.model, turns = request.contents.len()))]
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = parsed.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        Ok(parsed)
    }

    /// Send a request and return the first candidate's text.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::EmptyResponse` if the model produced no text,
    /// plus any error from [`GeminiClient::generate_content`].
    pub async fn generate_text(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, GeminiError> {
        let response = self.generate_content(request).await?;
        response.text().ok_or_else(|| {
            GeminiError::EmptyResponse(
                response
                    .finish_reason()
                    .unwrap_or("UNSPECIFIED")
                    .to_string(),
            )
        })
    }

    /// Map an error status code onto a `GeminiError`.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return GeminiError::Unauthorized("API key rejected".to_string());
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => GeminiError::Api {
                    status: if api_error.error.status.is_empty() {
                        api_error.error.code.to_string()
                    } else {
                        api_error.error.status
                    },
                    message: api_error.error.message,
                },
                Err(_) => GeminiError::Api {
                    status: status.as_u16().to_string(),
                    message: body,
                },
            },
            Err(e) => GeminiError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(model: &str, api_base: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: SecretString::from("AIzaSyB3k9Qm7Xw2Lp0Tn8Rv4Hc6Jd1Fg5Es"),
            model: model.to_string(),
            api_base: api_base.to_string(),
        }
    }

    #[test]
    fn test_endpoint_strips_model_prefix() {
        let client = GeminiClient::new(&config(
            "models/gemini-3-flash-preview",
            "https://generativelanguage.googleapis.com/v1beta/",
        ))
        .expect("client");

        assert_eq!(client.model(), "gemini-3-flash-preview");
        assert_eq!(
            client.inner.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_rejects_invalid_header_key() {
        let mut cfg = config("gemini-3-flash-preview", "http://localhost");
        cfg.api_key = SecretString::from("bad\nkey");
        assert!(matches!(
            GeminiClient::new(&cfg),
            Err(GeminiError::InvalidApiKey(_))
        ));
    }
}
