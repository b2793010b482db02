//! Storage abstractions for Formcraft.
//!
//! Defines the blob store trait. Implementations live in formcraft-infra.

pub mod blob_store;
