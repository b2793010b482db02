//! LLM provider implementations and wiring.

pub mod gemini;

use std::sync::Arc;

use secrecy::SecretString;

use formcraft_core::llm::box_provider::BoxLlmProvider;
use formcraft_core::llm::breaker::CircuitBreaker;
use formcraft_core::llm::resilient::ResilientGenerator;
use formcraft_core::llm::retry::RetryPolicy;
use formcraft_types::config::{GeminiConfig, GlobalConfig};

use self::gemini::GeminiProvider;

/// Create a Gemini provider for `api_key` against the configured endpoint.
pub fn create_provider(config: &GeminiConfig, api_key: &str) -> BoxLlmProvider {
    let provider = GeminiProvider::new(SecretString::from(api_key.to_string()))
        .with_base_url(config.base_url.clone());
    BoxLlmProvider::new(provider)
}

/// Build the process-wide generator, or `None` when no usable key is set.
///
/// `breaker` is shared with every other generator of the process.
pub fn build_generator(
    config: &GlobalConfig,
    breaker: Arc<CircuitBreaker>,
) -> Option<Arc<ResilientGenerator>> {
    let Some(api_key) = config.gemini.usable_api_key() else {
        tracing::info!("no usable Gemini API key configured, AI generation disabled");
        return None;
    };

    let provider = create_provider(&config.gemini, api_key);
    tracing::debug!(provider = provider.name(), model = %config.gemini.model, "generator ready");
    Some(Arc::new(ResilientGenerator::new(
        Arc::new(provider),
        breaker,
        RetryPolicy::from_config(&config.retry),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_generator_without_usable_key() {
        let breaker = Arc::new(CircuitBreaker::default());
        let mut config = GlobalConfig::default();
        assert!(build_generator(&config, Arc::clone(&breaker)).is_none());

        config.gemini.api_key = Some("too-short".to_string());
        assert!(build_generator(&config, Arc::clone(&breaker)).is_none());

        config.gemini.api_key = Some("AIza-0123456789-abcdefghij".to_string());
        let generator = build_generator(&config, Arc::clone(&breaker)).unwrap();
        assert_eq!(generator.provider_name(), "gemini");
        assert!(Arc::ptr_eq(generator.breaker(), &breaker));
        assert_eq!(generator.policy().max_retries, 2);
    }
}
