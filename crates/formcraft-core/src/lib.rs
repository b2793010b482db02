//! Business logic and port traits for Formcraft.
//!
//! This crate defines the ports (`LlmProvider`, `BlobStore`) that the
//! infrastructure layer implements, plus everything that runs on top of them:
//! field heuristics, classification, the resilient generation wrapper, the
//! reply and form generators, and the form/submission/backup services. It
//! depends only on `formcraft-types`, never on `formcraft-infra`.

pub mod classify;
pub mod designer;
pub mod fallback;
pub mod heuristics;
pub mod llm;
pub mod responder;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
