//! LlmProvider trait definition.

use formcraft_types::llm::{GenerationRequest, LlmError};

/// Trait for generative-text backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in formcraft-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate text for a single prompt.
    ///
    /// Failures must use the [`LlmError`] taxonomy so callers can tell
    /// permanent failures (permission, quota) from transient ones.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
