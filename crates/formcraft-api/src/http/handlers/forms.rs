//! Saved form CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use formcraft_types::form::{FormSchema, SavedForm};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FormList {
    pub forms: Vec<SavedForm>,
    pub total: usize,
}

/// GET /api/v1/forms - All saved forms, newest first.
pub async fn list_forms(State(state): State<AppState>) -> Result<ApiResponse<FormList>, AppError> {
    let ctx = RequestContext::start();

    let forms = state.form_service.list_forms().await?;
    let total = forms.len();

    Ok(ctx
        .success(FormList { forms, total })
        .with_link("self", "/api/v1/forms"))
}

/// POST /api/v1/forms - Save a form schema under a fresh id.
pub async fn create_form(
    State(state): State<AppState>,
    Json(schema): Json<FormSchema>,
) -> Result<ApiResponse<SavedForm>, AppError> {
    let ctx = RequestContext::start();

    let form = state.form_service.save_form(schema).await?;
    let id = form.id().to_string();

    Ok(ctx
        .success(form)
        .with_link("self", &format!("/api/v1/forms/{id}"))
        .with_link("embed", &format!("/api/v1/embed?id={id}")))
}

/// GET /api/v1/forms/{id} - One saved form, by id or generation id.
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SavedForm>, AppError> {
    let ctx = RequestContext::start();

    let form = state.form_service.get_form(&id).await?;
    let embed = format!("/api/v1/embed?id={}", form.id());

    Ok(ctx
        .success(form)
        .with_link("self", &format!("/api/v1/forms/{id}"))
        .with_link("embed", &embed))
}

/// DELETE /api/v1/forms/{id}
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let ctx = RequestContext::start();

    state.form_service.delete_form(&id).await?;

    Ok(ctx.success(serde_json::json!({ "deleted": true, "id": id })))
}
