//! Form design endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use formcraft_types::form::FormSchema;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DesignRequest {
    /// Free-text description of the wanted form. Missing means empty, which
    /// fails the length check.
    #[serde(default)]
    pub request: String,
}

/// POST /api/v1/design - Generate a form schema from a description.
///
/// Never fails because of the model: any upstream problem yields a template
/// form tagged with the fallback reason. Only a too-short description is
/// rejected.
pub async fn design_form(
    State(state): State<AppState>,
    Json(body): Json<DesignRequest>,
) -> Result<ApiResponse<FormSchema>, AppError> {
    let ctx = RequestContext::start();

    let schema = state.designer.design(&body.request).await?;
    tracing::info!(
        form_type = %schema.form_type(),
        method = ?schema.metadata.method,
        fields = schema.fields.len(),
        "form designed"
    );

    Ok(ctx
        .success(schema)
        .with_link("save", "/api/v1/forms")
        .with_link("self", "/api/v1/design"))
}
