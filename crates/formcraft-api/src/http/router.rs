//! Axum router configuration with middleware.
//!
//! JSON routes live under `/api/v1/`; `/health` and `/blobs/*` sit at the
//! root. Middleware: CORS (the widget is embedded on foreign origins) and
//! request tracing.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use formcraft_types::storage::MAX_UPLOAD_BYTES;

use crate::http::handlers;
use crate::state::AppState;

/// Body limit for `/collect`: a few maximum-size files plus text fields.
const COLLECT_BODY_LIMIT: usize = 4 * MAX_UPLOAD_BYTES;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Generation
        .route("/design", post(handlers::design::design_form))
        .route("/submit", post(handlers::submit::submit_message))
        // Saved forms
        .route(
            "/forms",
            get(handlers::forms::list_forms).post(handlers::forms::create_form),
        )
        .route(
            "/forms/{id}",
            get(handlers::forms::get_form).delete(handlers::forms::delete_form),
        )
        // Collection
        .route(
            "/collect",
            post(handlers::collect::collect_submission)
                .get(handlers::collect::list_submissions)
                .layer(DefaultBodyLimit::max(COLLECT_BODY_LIMIT)),
        )
        .route("/embed", get(handlers::embed::embed_widget))
        // Maintenance
        .route("/backup", get(handlers::backup::create_backup))
        .route("/stats", get(handlers::backup::get_stats));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health_check))
        .route("/blobs/{*path}", get(handlers::blobs::get_blob))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
