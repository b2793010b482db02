//! HTTP/REST API layer for Formcraft.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format, an
//! HTML embed widget and CORS support.

pub mod embed;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
