//! Shared domain types for Formcraft.
//!
//! This crate contains the core domain types used across the Formcraft
//! workspace: form schemas, submissions, the LLM request/error taxonomy,
//! blob storage entries, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod backup;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod storage;
pub mod submission;
