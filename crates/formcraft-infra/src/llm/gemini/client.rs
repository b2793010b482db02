//! GeminiProvider -- [`LlmProvider`] implementation for Google Gemini.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when building
//! the request header. It never appears in `Debug` output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use formcraft_core::llm::provider::LlmProvider;
use formcraft_types::llm::{GenerationRequest, LlmError, is_allowed_model};

use super::types::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse};

/// Per-request HTTP timeout. The designer applies its own, shorter, race.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn to_gemini_request(request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.options.max_output_tokens,
                temperature: request.options.temperature,
                top_p: request.options.top_p,
            },
        }
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map a non-success response to the error taxonomy.
pub fn map_error(status: u16, body: &str) -> LlmError {
    let detail = format!("HTTP {status}: {body}");
    let upper = body.to_uppercase();

    if status == 403 || upper.contains("PERMISSION_DENIED") {
        LlmError::PermissionDenied(detail)
    } else if status == 429 || upper.contains("QUOTA_EXCEEDED") || upper.contains("RESOURCE_EXHAUSTED") {
        LlmError::QuotaExceeded(detail)
    } else if status == 503 || upper.contains("OVERLOADED") || upper.contains("UNAVAILABLE") {
        LlmError::Overloaded(detail)
    } else {
        LlmError::Api(detail)
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        if !is_allowed_model(&request.model) {
            return Err(LlmError::InvalidRequest(format!(
                "Modèle non autorisé: {}",
                request.model
            )));
        }

        let body = Self::to_gemini_request(request);
        let response = self
            .client
            .post(self.url(&request.model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Api(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "gemini call failed");
            return Err(map_error(status.as_u16(), &error_body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("failed to parse response: {e}")))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use formcraft_types::llm::DEFAULT_MODEL;

    use super::*;

    /// Serve `app` on an ephemeral local port and return its base URL.
    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn stub_provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(SecretString::from("test-key-not-real-000000")).with_base_url(base_url)
    }

    fn provider() -> GeminiProvider {
        // Port 9 (discard) is never contacted by these tests.
        GeminiProvider::new(SecretString::from("test-key-not-real-000000")).with_base_url("http://127.0.0.1:9/")
    }

    #[test]
    fn test_error_mapping_by_status() {
        assert!(matches!(map_error(403, ""), LlmError::PermissionDenied(_)));
        assert!(matches!(map_error(429, ""), LlmError::QuotaExceeded(_)));
        assert!(matches!(map_error(503, ""), LlmError::Overloaded(_)));
        assert!(matches!(map_error(500, "boom"), LlmError::Api(_)));
    }

    #[test]
    fn test_error_mapping_by_body() {
        let body = r#"{"error": {"code": 400, "status": "PERMISSION_DENIED"}}"#;
        assert!(matches!(map_error(400, body), LlmError::PermissionDenied(_)));
        let body = r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(map_error(400, body), LlmError::QuotaExceeded(_)));
        assert!(matches!(
            map_error(500, "The model is overloaded."),
            LlmError::Overloaded(_)
        ));
        assert!(matches!(
            map_error(500, r#"{"error": {"status": "UNAVAILABLE"}}"#),
            LlmError::Overloaded(_)
        ));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{"candidates": [
            {"content": {"role": "model", "parts": [{"text": "Bonjour "}, {"text": "Jean"}]}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "Bonjour Jean");

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_request_shape() {
        let request = GenerationRequest::new("Salut", DEFAULT_MODEL)
            .with_max_output_tokens(300)
            .with_top_p(0.5);
        let json = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Salut");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 300);
        assert_eq!(json["generationConfig"]["topP"], 0.5);
    }

    #[test]
    fn test_url_and_debug() {
        let provider = provider();
        assert_eq!(
            provider.url("gemini-1.5-pro"),
            "http://127.0.0.1:9/v1beta/models/gemini-1.5-pro:generateContent"
        );
        let debug = format!("{provider:?}");
        assert!(!debug.contains("test-key"));
    }

    #[tokio::test]
    async fn test_overloaded_response_maps_to_overloaded() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    r#"{"error":{"code":503,"status":"UNAVAILABLE","message":"The model is overloaded."}}"#,
                )
            }),
        );
        let provider = stub_provider(spawn_stub(app).await);

        let err = provider
            .generate(&GenerationRequest::new("Salut", DEFAULT_MODEL))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(ref m) if m.contains("HTTP 503")));
    }

    #[tokio::test]
    async fn test_forbidden_response_maps_to_permission_denied() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let provider = stub_provider(spawn_stub(app).await);

        let err = provider
            .generate(&GenerationRequest::new("Salut", DEFAULT_MODEL))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_success_sends_key_and_returns_text() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|headers: HeaderMap| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if key != "test-key-not-real-000000" {
                    return (StatusCode::FORBIDDEN, String::new());
                }
                (
                    StatusCode::OK,
                    r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Bonjour "},{"text":"Jean"}]}}]}"#
                        .to_string(),
                )
            }),
        );
        let provider = stub_provider(spawn_stub(app).await);

        let text = provider
            .generate(&GenerationRequest::new("Salut", DEFAULT_MODEL))
            .await
            .unwrap();
        assert_eq!(text, "Bonjour Jean");
    }

    #[tokio::test]
    async fn test_disallowed_model_is_rejected_before_call() {
        let request = GenerationRequest::new("Salut", "gpt-4");
        let err = provider().generate(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidRequest(ref m) if m.contains("gpt-4")));
    }
}
