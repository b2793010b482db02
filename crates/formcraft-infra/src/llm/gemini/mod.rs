//! Google Gemini provider.
//!
//! [`GeminiProvider`] implements
//! [`LlmProvider`](formcraft_core::llm::provider::LlmProvider) over the
//! `generateContent` REST endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
