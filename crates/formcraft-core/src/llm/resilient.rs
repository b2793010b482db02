//! Retry + circuit breaker wrapper around a single provider.

use std::sync::Arc;

use tracing::Instrument;

use formcraft_types::llm::{GenerationRequest, LlmError};

use super::box_provider::BoxLlmProvider;
use super::breaker::CircuitBreaker;
use super::retry::RetryPolicy;

/// Protects callers from a degraded generative API.
///
/// - Breaker open: fail with [`LlmError::CircuitOpen`] without calling out.
/// - Breaker closed: call the provider, retrying transient failures per the
///   [`RetryPolicy`]. Every failed attempt is recorded on the breaker, so one
///   caller-visible failure can count several times toward the threshold.
/// - First success resets the breaker and returns the trimmed text.
pub struct ResilientGenerator {
    provider: Arc<BoxLlmProvider>,
    breaker: Arc<CircuitBreaker>,
    policy: RetryPolicy,
}

impl ResilientGenerator {
    pub fn new(provider: Arc<BoxLlmProvider>, breaker: Arc<CircuitBreaker>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            breaker,
            policy,
        }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate text, retrying and tripping the breaker as described above.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        if self.breaker.is_open() {
            tracing::warn!(
                provider = self.provider.name(),
                "circuit breaker open, skipping generation call"
            );
            return Err(LlmError::CircuitOpen);
        }

        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;
        loop {
            let span = tracing::info_span!(
                "gen_ai.generate",
                gen_ai.system = self.provider.name(),
                gen_ai.request.model = %request.model,
                gen_ai.request.max_tokens = request.options.max_output_tokens,
                gen_ai.request.temperature = request.options.temperature,
                attempt = attempt + 1,
            );
            let outcome = match self.provider.generate(request).instrument(span).await {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        Err(LlmError::EmptyResponse)
                    } else {
                        Ok(trimmed.to_string())
                    }
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(text) => {
                    self.breaker.record_success();
                    tracing::debug!(
                        provider = self.provider.name(),
                        model = %request.model,
                        attempt = attempt + 1,
                        chars = text.len(),
                        "generation succeeded"
                    );
                    return Ok(text);
                }
                Err(error) => {
                    // Rejected before any network call: not an upstream failure.
                    if !matches!(error, LlmError::InvalidRequest(_)) {
                        self.breaker.record_failure();
                    }

                    if !error.is_transient() {
                        tracing::warn!(
                            provider = self.provider.name(),
                            error = %error,
                            "non-transient generation failure, not retrying"
                        );
                        return Err(error);
                    }

                    if attempt + 1 >= max_attempts {
                        tracing::warn!(
                            provider = self.provider.name(),
                            attempts = max_attempts,
                            error = %error,
                            "generation failed after all attempts"
                        );
                        return Err(error);
                    }

                    let delay = self.policy.delay_for(attempt);
                    tracing::info!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for ResilientGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientGenerator")
            .field("provider", &self.provider.name())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use formcraft_types::llm::DEFAULT_MODEL;

    use super::*;
    use crate::testing::MockProvider;

    fn wrap(provider: MockProvider, breaker: Arc<CircuitBreaker>) -> ResilientGenerator {
        ResilientGenerator::new(
            Arc::new(BoxLlmProvider::new(provider)),
            breaker,
            RetryPolicy::immediate(2),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("Bonjour", DEFAULT_MODEL)
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_text_and_resets_breaker() {
        let breaker = Arc::new(CircuitBreaker::default());
        breaker.record_failure();
        breaker.record_failure();

        let provider = MockProvider::always(Ok("  Merci !\n".to_string()));
        let calls = provider.calls();
        let generator = wrap(provider, Arc::clone(&breaker));

        let text = generator.generate(&request()).await.unwrap();
        assert_eq!(text, "Merci !");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_permission_denied_is_not_retried() {
        let breaker = Arc::new(CircuitBreaker::default());
        let provider = MockProvider::always(Err(LlmError::PermissionDenied("403".to_string())));
        let calls = provider.calls();
        let generator = wrap(provider, Arc::clone(&breaker));

        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::PermissionDenied(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(breaker.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_leaves_breaker_alone() {
        let breaker = Arc::new(CircuitBreaker::default());
        let provider = MockProvider::always(Err(LlmError::InvalidRequest("x".to_string())));
        let calls = provider.calls();
        let generator = wrap(provider, Arc::clone(&breaker));

        assert!(generator.generate(&request()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_quota_exceeded_is_not_retried() {
        let provider = MockProvider::always(Err(LlmError::QuotaExceeded("429".to_string())));
        let calls = provider.calls();
        let generator = wrap(provider, Arc::new(CircuitBreaker::default()));

        assert!(generator.generate(&request()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_uses_three_attempts() {
        let breaker = Arc::new(CircuitBreaker::new(10, Duration::from_secs(60)));
        let provider = MockProvider::always(Err(LlmError::Overloaded("503".to_string())));
        let calls = provider.calls();
        let generator = wrap(provider, Arc::clone(&breaker));

        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // one breaker failure per attempt
        assert_eq!(breaker.failure_count(), 3);
    }

    #[tokio::test]
    async fn test_recovers_on_retry() {
        let breaker = Arc::new(CircuitBreaker::default());
        let provider = MockProvider::sequence(
            vec![
                Err(LlmError::Api("connection reset".to_string())),
                Ok("   ".to_string()),
            ],
            Ok("Réponse".to_string()),
        );
        let calls = provider.calls();
        let generator = wrap(provider, Arc::clone(&breaker));

        let text = generator.generate(&request()).await.unwrap();
        assert_eq!(text, "Réponse");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_response_surfaces_after_retries() {
        let provider = MockProvider::always(Ok(String::new()));
        let generator = wrap(provider, Arc::new(CircuitBreaker::new(10, Duration::from_secs(60))));
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err, LlmError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_open_breaker_makes_zero_calls() {
        let breaker = Arc::new(CircuitBreaker::default());
        let failing = MockProvider::always(Err(LlmError::Overloaded("503".to_string())));
        let generator = wrap(failing, Arc::clone(&breaker));

        // One call with three failed attempts trips the default threshold.
        assert!(generator.generate(&request()).await.is_err());
        assert!(breaker.is_open());

        let healthy = MockProvider::always(Ok("ok".to_string()));
        let calls = healthy.calls();
        let generator = wrap(healthy, Arc::clone(&breaker));
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err, LlmError::CircuitOpen);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let provider = MockProvider::always(Err(LlmError::Api("boom".to_string())));
        let generator = ResilientGenerator::new(
            Arc::new(BoxLlmProvider::new(provider)),
            Arc::new(CircuitBreaker::new(10, Duration::from_secs(60))),
            RetryPolicy {
                max_jitter: Duration::ZERO,
                ..RetryPolicy::default()
            },
        );

        let started = tokio::time::Instant::now();
        assert!(generator.generate(&request()).await.is_err());
        // 1500ms after the first attempt, 2250ms after the second
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(3750));
        assert!(elapsed < Duration::from_millis(3800));
    }
}
