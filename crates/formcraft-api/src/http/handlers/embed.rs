//! Embeddable widget endpoint.

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use formcraft_core::designer::templates::quick_contact;

use crate::http::embed::{WidgetOptions, render_widget};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmbedQuery {
    pub id: Option<String>,
    pub theme: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// GET /api/v1/embed - Standalone HTML page rendering one form.
///
/// Always answers with a usable widget: an unknown id renders the most
/// recent form, and a storage failure renders the quick contact form.
pub async fn embed_widget(
    State(state): State<AppState>,
    Query(query): Query<EmbedQuery>,
) -> Html<String> {
    let requested = query.id.as_deref();

    let resolved = match state.form_service.resolve_embed_form(requested).await {
        Ok(form) => form,
        Err(e) => {
            tracing::error!(form_id = ?requested, error = %e, "embed form lookup failed");
            None
        }
    };

    let (schema, form_id) = match resolved {
        Some(form) => {
            let id = form.id().to_string();
            (form.schema, Some(id))
        }
        None => (quick_contact(), None),
    };

    let options = WidgetOptions::new(
        form_id.as_deref().or(requested),
        query.theme.as_deref(),
        query.width.as_deref(),
        query.height.as_deref(),
        state.public_url(),
    );
    tracing::debug!(form_id = %options.form_id, title = %schema.title, "rendering embed widget");

    Html(render_widget(&schema, &options))
}
