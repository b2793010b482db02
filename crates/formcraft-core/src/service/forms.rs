//! Form persistence service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use formcraft_types::error::FormError;
use formcraft_types::form::{FormSchema, SavedForm};
use formcraft_types::storage::FORMS_PREFIX;

use super::{load_all, put_json};
use crate::storage::blob_store::BlobStore;

/// Embed id meaning "no saved form, use the quick contact form".
pub const DEFAULT_EMBED_ID: &str = "default";

/// Load every saved form, newest first.
pub async fn load_forms<S: BlobStore>(store: &S) -> Result<Vec<SavedForm>, FormError> {
    let mut forms: Vec<SavedForm> = load_all(store, FORMS_PREFIX).await?;
    forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(forms)
}

fn form_path(id: &str) -> String {
    format!("{FORMS_PREFIX}{id}.json")
}

/// CRUD over saved form schemas.
pub struct FormService<S: BlobStore> {
    store: Arc<S>,
}

impl<S: BlobStore> Clone for FormService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BlobStore> FormService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist `schema` under a fresh id.
    ///
    /// Any id the schema already carries is replaced; the generation id in
    /// `_metadata.formId` is kept so older embed snippets still resolve.
    pub async fn save_form(&self, mut schema: FormSchema) -> Result<SavedForm, FormError> {
        if schema.fields.is_empty() {
            return Err(FormError::Invalid("a form needs at least one field".to_string()));
        }
        let id = Uuid::now_v7().to_string();
        schema.id = Some(id.clone());
        let form = SavedForm {
            schema,
            created_at: Utc::now(),
        };

        let entry = put_json(self.store.as_ref(), &form_path(&id), &form).await?;
        tracing::info!(form_id = %id, url = %entry.url, title = %form.schema.title, "form saved");
        Ok(form)
    }

    pub async fn list_forms(&self) -> Result<Vec<SavedForm>, FormError> {
        load_forms(self.store.as_ref()).await
    }

    /// Find a form by id, then by legacy generation id.
    pub async fn find_form(&self, id: &str) -> Result<Option<SavedForm>, FormError> {
        let forms = self.list_forms().await?;
        Ok(find_in(forms, id))
    }

    pub async fn get_form(&self, id: &str) -> Result<SavedForm, FormError> {
        self.find_form(id)
            .await?
            .ok_or_else(|| FormError::NotFound(id.to_string()))
    }

    pub async fn delete_form(&self, id: &str) -> Result<(), FormError> {
        let form = self.get_form(id).await?;
        self.store.delete(&form_path(form.id())).await?;
        tracing::info!(form_id = %form.id(), "form deleted");
        Ok(())
    }

    /// Form to render in the embed widget.
    ///
    /// Unknown ids resolve to the most recent form; `None` means the caller
    /// should render the quick contact form.
    pub async fn resolve_embed_form(&self, id: Option<&str>) -> Result<Option<SavedForm>, FormError> {
        let Some(id) = id.filter(|id| !id.is_empty() && *id != DEFAULT_EMBED_ID) else {
            return Ok(None);
        };

        let mut forms = self.list_forms().await?;
        if let Some(position) = position_of(&forms, id) {
            return Ok(Some(forms.swap_remove(position)));
        }

        let newest = forms.into_iter().next();
        if let Some(form) = &newest {
            tracing::warn!(
                requested = %id,
                using = %form.id(),
                "embed form not found, using most recent"
            );
        }
        Ok(newest)
    }
}

fn position_of(forms: &[SavedForm], id: &str) -> Option<usize> {
    forms
        .iter()
        .position(|f| f.id() == id)
        .or_else(|| {
            forms
                .iter()
                .position(|f| f.schema.metadata.form_id.as_deref() == Some(id))
        })
}

fn find_in(mut forms: Vec<SavedForm>, id: &str) -> Option<SavedForm> {
    position_of(&forms, id).map(|position| forms.swap_remove(position))
}
