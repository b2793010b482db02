//! Submission collection handlers.
//!
//! `POST /api/v1/collect` receives multipart form data from the embed
//! widget (or any plain HTML form). Hidden control fields are lifted out
//! before the remaining fields reach the collection pipeline.

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;

use formcraft_core::service::submissions::DASHBOARD_LIMIT;
use formcraft_types::submission::{
    CollectReceipt, IncomingSubmission, SubmissionSummary, UploadedFile,
};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /api/v1/collect - Store a submission and reply to the submitter.
pub async fn collect_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<ApiResponse<CollectReceipt>, AppError> {
    let ctx = RequestContext::start();
    let mut incoming = IncomingSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Données de formulaire invalides: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(filename) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Fichier illisible: {e}")))?;
            incoming.files.push(UploadedFile {
                field: name,
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Champ illisible: {e}")))?;
        apply_field(&mut incoming, name, value);
    }

    incoming.ip = client_ip(&headers);
    incoming.user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let receipt = state.submission_service.collect(incoming).await?;

    Ok(ctx
        .success(receipt)
        .with_link("submissions", "/api/v1/collect"))
}

/// GET /api/v1/collect - Dashboard view of recent submissions.
pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<ApiResponse<SubmissionSummary>, AppError> {
    let ctx = RequestContext::start();

    let summary = state.submission_service.summary(DASHBOARD_LIMIT).await?;

    Ok(ctx.success(summary).with_link("self", "/api/v1/collect"))
}

/// Route one text field to its control slot or to the submitted fields.
pub fn apply_field(incoming: &mut IncomingSubmission, name: String, value: String) {
    match name.as_str() {
        "_test" => incoming.is_test = is_true(&value),
        "_embedded" => incoming.embedded = is_true(&value),
        "_formType" => incoming.form_type = non_empty(value),
        "_formId" => incoming.form_id = non_empty(value),
        "_embedUrl" => incoming.embed_url = non_empty(value),
        "_embedDomain" => incoming.embed_domain = non_empty(value),
        _ => {
            incoming.fields.insert(name, value);
        }
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First address of `x-forwarded-for`, else `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}
