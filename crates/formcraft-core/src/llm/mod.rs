//! Generative-text abstractions for Formcraft.
//!
//! - `LlmProvider`: RPITIT trait for concrete providers
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `CircuitBreaker`: process-wide failure counter shared by all callers
//! - `RetryPolicy` / `ResilientGenerator`: bounded retry with backoff around one provider

pub mod box_provider;
pub mod breaker;
pub mod provider;
pub mod resilient;
pub mod retry;
