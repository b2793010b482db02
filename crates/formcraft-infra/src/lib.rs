//! Infrastructure layer for Formcraft.
//!
//! Implements the ports defined in `formcraft-core`: the Gemini
//! [`LlmProvider`](formcraft_core::llm::provider::LlmProvider) and the
//! filesystem [`BlobStore`](formcraft_core::storage::blob_store::BlobStore),
//! plus the `config.toml` loader.

pub mod blob;
pub mod config;
pub mod llm;
