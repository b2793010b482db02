//! Submission collection pipeline.
//!
//! One incoming request becomes one immutable [`Submission`]: control fields
//! resolved, files uploaded, contact fields normalized, type classified,
//! persisted, then answered. Persistence failures abort the request; reply
//! generation never does.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use formcraft_types::error::{StorageError, SubmissionError};
use formcraft_types::form::FormType;
use formcraft_types::storage::{MAX_UPLOAD_BYTES, SUBMISSIONS_PREFIX, UPLOADS_PREFIX, sanitize_filename};
use formcraft_types::submission::{
    CollectReceipt, EmbedContext, FieldValue, FileRef, IncomingSubmission, Submission,
    SubmissionFields, SubmissionSummary, UploadedFile,
};

use super::forms::FormService;
use super::{load_all, put_json};
use crate::classify::classify_submission;
use crate::heuristics::{detect_shipment, normalize_contact};
use crate::responder::{SubmissionResponder, context_hint};
use crate::storage::blob_store::BlobStore;

/// Submissions shown on the dashboard.
pub const DASHBOARD_LIMIT: usize = 50;

/// Recorded when client metadata is missing.
const UNKNOWN: &str = "unknown";

/// Load every stored submission, newest first.
pub async fn load_submissions<S: BlobStore>(store: &S) -> Result<Vec<Submission>, SubmissionError> {
    let mut submissions: Vec<Submission> = load_all(store, SUBMISSIONS_PREFIX).await?;
    submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(submissions)
}

/// Collects, stores and answers submissions.
pub struct SubmissionService<S: BlobStore> {
    store: Arc<S>,
    forms: FormService<S>,
    responder: SubmissionResponder,
}

impl<S: BlobStore> SubmissionService<S> {
    pub fn new(store: Arc<S>, responder: SubmissionResponder) -> Self {
        Self {
            forms: FormService::new(Arc::clone(&store)),
            store,
            responder,
        }
    }

    /// Run the collection pipeline for one request.
    #[tracing::instrument(skip_all, fields(embedded = incoming.embedded, is_test = incoming.is_test))]
    pub async fn collect(&self, incoming: IncomingSubmission) -> Result<CollectReceipt, SubmissionError> {
        let id = Uuid::now_v7().to_string();

        let mut hint = incoming
            .form_type
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(FormType::from_tag);

        let embed = if incoming.embedded {
            let mut context = EmbedContext {
                form_id: incoming.form_id.clone(),
                url: incoming.embed_url.clone(),
                domain: incoming.embed_domain.clone(),
                ..Default::default()
            };
            if let Some(form_id) = incoming.form_id.as_deref().filter(|f| !f.is_empty()) {
                match self.forms.find_form(form_id).await {
                    Ok(Some(form)) => {
                        context.original_form_title = Some(form.schema.title.clone());
                        context.original_form_description = Some(form.schema.description.clone());
                        hint = Some(form.schema.form_type());
                    }
                    Ok(None) => tracing::debug!(form_id, "embedded form not found"),
                    Err(e) => tracing::warn!(form_id, error = %e, "failed to look up embedded form"),
                }
            }
            Some(context)
        } else {
            None
        };

        let mut fields: SubmissionFields = incoming
            .fields
            .into_iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, value)| (name, FieldValue::Text(value)))
            .collect();

        let mut files = Vec::new();
        let mut uploaded = Vec::new();
        for file in incoming.files.into_iter().filter(|f| !f.bytes.is_empty()) {
            let field = file.field.clone();
            let filename = file.filename.clone();
            match self.upload(file).await {
                Ok((path, file_ref)) => {
                    uploaded.push(path);
                    files.push(file_ref.url.clone());
                    fields.insert(field, FieldValue::File(file_ref));
                }
                Err(e) => {
                    tracing::warn!(field = %field, filename = %filename, error = %e, "file upload failed");
                    fields.insert(field, FieldValue::Text(format!("Erreur upload: {filename}")));
                }
            }
        }

        let normalized = normalize_contact(&fields);
        if normalized.is_empty() {
            self.discard_uploads(&uploaded).await;
            return Err(SubmissionError::MissingContact);
        }

        let form_type = classify_submission(hint, &fields);
        let shipment = (form_type == FormType::Expedition).then(|| detect_shipment(&fields));

        let submission = Submission {
            id,
            timestamp: Utc::now(),
            form_type,
            is_test: incoming.is_test,
            fields,
            normalized,
            shipment,
            embed,
            files,
            ip: incoming.ip.unwrap_or_else(|| UNKNOWN.to_string()),
            user_agent: incoming.user_agent.unwrap_or_else(|| UNKNOWN.to_string()),
        };

        let path = format!("{SUBMISSIONS_PREFIX}{}.json", submission.id);
        put_json(self.store.as_ref(), &path, &submission).await?;
        tracing::info!(
            submission_id = %submission.id,
            form_type = %submission.form_type,
            files = submission.files.len(),
            "submission stored"
        );

        let reply = self
            .responder
            .respond(&submission, &context_hint(&submission))
            .await;

        Ok(CollectReceipt {
            success: true,
            message: reply.text,
            reply_method: reply.method,
            submission_id: submission.id.clone(),
            form_type: submission.form_type,
            is_test: submission.is_test,
            is_embedded: submission.is_embedded(),
            files_uploaded: submission.files.len(),
        })
    }

    pub async fn list_submissions(&self) -> Result<Vec<Submission>, SubmissionError> {
        load_submissions(self.store.as_ref()).await
    }

    /// Newest `limit` submissions plus totals over all of them.
    pub async fn summary(&self, limit: usize) -> Result<SubmissionSummary, SubmissionError> {
        let all = self.list_submissions().await?;
        let tests = all.iter().filter(|s| s.is_test).count();
        let embedded = all.iter().filter(|s| s.is_embedded()).count();
        let total = all.len();

        Ok(SubmissionSummary {
            submissions: all.into_iter().take(limit).collect(),
            total,
            tests,
            real: total - tests,
            embedded,
        })
    }

    /// Store one upload. Returns its store-relative path and the reference
    /// kept in the submission.
    async fn upload(&self, file: UploadedFile) -> Result<(String, FileRef), SubmissionError> {
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(StorageError::TooLarge(format!(
                "{} exceeds {MAX_UPLOAD_BYTES} bytes",
                file.filename
            ))
            .into());
        }

        let path = format!(
            "{UPLOADS_PREFIX}{}-{}",
            Uuid::now_v7(),
            sanitize_filename(&file.filename)
        );
        let entry = self.store.put(&path, file.bytes, &file.content_type).await?;
        let file_ref = FileRef {
            url: entry.url,
            filename: file.filename,
            content_type: file.content_type,
            size: entry.size,
        };
        Ok((path, file_ref))
    }

    async fn discard_uploads(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.store.delete(path).await {
                tracing::warn!(path = %path, error = %e, "failed to remove upload of rejected submission");
            }
        }
    }
}
