//! LLM request types and the failure taxonomy for generative calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Models the application is allowed to call.
pub const ALLOWED_MODELS: [&str; 3] = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-flash-exp"];

/// Whether `model` is one of [`ALLOWED_MODELS`].
pub fn is_allowed_model(model: &str) -> bool {
    ALLOWED_MODELS.contains(&model)
}

/// Sampling options for a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: 1000,
            temperature: 0.7,
            top_p: 0.8,
        }
    }
}

/// A single-prompt text generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.options.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.options.top_p = top_p;
        self
    }
}

/// Errors from generative calls.
///
/// Every kind is distinguishable so callers can choose their fallback
/// messaging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("invalid API key or insufficient permissions: {0}")]
    PermissionDenied(String),

    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("model overloaded: {0}")]
    Overloaded(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("circuit breaker open - API temporarily unavailable")]
    CircuitOpen,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error: {0}")]
    Api(String),
}

impl LlmError {
    /// Whether the retry loop may attempt the call again.
    ///
    /// Permission, quota and request-shape failures propagate on the first
    /// attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            LlmError::PermissionDenied(_) | LlmError::QuotaExceeded(_) | LlmError::InvalidRequest(_)
        )
    }
}

/// Circuit breaker state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakerState {
    Closed,
    Open,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerState::Closed => write!(f, "closed"),
            BreakerState::Open => write!(f, "open"),
        }
    }
}

/// Point-in-time snapshot of the breaker for health/status display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerStatus {
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub last_failure_secs_ago: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Overloaded("503".to_string()).is_transient());
        assert!(LlmError::Api("boom".to_string()).is_transient());
        assert!(LlmError::EmptyResponse.is_transient());
        assert!(!LlmError::PermissionDenied("403".to_string()).is_transient());
        assert!(!LlmError::QuotaExceeded("429".to_string()).is_transient());
        assert!(!LlmError::InvalidRequest("model".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = LlmError::QuotaExceeded("429 Too Many Requests".to_string());
        assert!(err.to_string().contains("429"));
        assert!(LlmError::CircuitOpen.to_string().contains("circuit breaker open"));
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("hello", DEFAULT_MODEL)
            .with_max_output_tokens(300)
            .with_temperature(0.2);
        assert_eq!(request.options.max_output_tokens, 300);
        assert!((request.options.temperature - 0.2).abs() < f32::EPSILON);
        assert!((request.options.top_p - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_allowed_models() {
        assert!(is_allowed_model("gemini-1.5-pro"));
        assert!(!is_allowed_model("gpt-4"));
    }
}
