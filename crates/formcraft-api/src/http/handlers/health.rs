//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use formcraft_types::llm::BreakerStatus;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether a usable Gemini key is configured.
    pub generation_configured: bool,
    pub breaker: BreakerStatus,
}

/// GET /health - Status, version and circuit breaker snapshot.
pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        generation_configured: state.generator.is_some(),
        breaker: state.breaker.status(),
    })
}
