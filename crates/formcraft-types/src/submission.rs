//! Submission types.
//!
//! A [`Submission`] is built once per incoming request by the collection
//! pipeline and stored verbatim at `submissions/{id}.json`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::FormType;

/// Reference to a file uploaded alongside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Value of a single submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    File(FileRef),
}

impl FieldValue {
    /// The text content, if this is a plain text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Flat field-name to value mapping of a submission.
pub type SubmissionFields = BTreeMap<String, FieldValue>;

/// Name / email / message resolved by the field heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NormalizedContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

/// Shipment-specific fields extracted from an expedition submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

/// Where an embedded submission came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_form_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_form_description: Option<String>,
}

/// A collected form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub form_type: FormType,
    pub is_test: bool,
    pub fields: SubmissionFields,
    #[serde(default)]
    pub normalized: NormalizedContact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment: Option<ShipmentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedContext>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub user_agent: String,
}

impl Submission {
    pub fn is_embedded(&self) -> bool {
        self.embed.is_some()
    }

    /// Text value of a field, if present and textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_text)
    }
}

/// A file uploaded with an incoming submission, before it is stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw submission request as received from the HTTP layer.
///
/// Hidden control fields (`_test`, `_formType`, `_embedded`, ...) have
/// already been lifted out of `fields`.
#[derive(Debug, Clone, Default)]
pub struct IncomingSubmission {
    pub fields: BTreeMap<String, String>,
    pub files: Vec<UploadedFile>,
    pub is_test: bool,
    pub form_type: Option<String>,
    pub embedded: bool,
    pub form_id: Option<String>,
    pub embed_url: Option<String>,
    pub embed_domain: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// How the reply text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMethod {
    Ai,
    Fallback,
}

/// Result returned to the submitter after collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectReceipt {
    pub success: bool,
    pub message: String,
    pub reply_method: ReplyMethod,
    pub submission_id: String,
    pub form_type: FormType,
    pub is_test: bool,
    pub is_embedded: bool,
    pub files_uploaded: usize,
}

/// Dashboard listing: the newest submissions plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub submissions: Vec<Submission>,
    pub total: usize,
    pub tests: usize,
    pub real: usize,
    pub embedded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged_serde() {
        let text: FieldValue = serde_json::from_str("\"Jean\"").unwrap();
        assert_eq!(text, FieldValue::Text("Jean".to_string()));

        let file = FieldValue::File(FileRef {
            url: "http://localhost/blobs/uploads/a.pdf".to_string(),
            filename: "a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 12,
        });
        let json = serde_json::to_string(&file).unwrap();
        let parsed: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, file);
        assert!(parsed.as_text().is_none());
    }

    #[test]
    fn test_submission_roundtrip() {
        let mut fields = SubmissionFields::new();
        fields.insert("nom".to_string(), "Jean".into());
        fields.insert("ville_origine".to_string(), "Abidjan".into());

        let submission = Submission {
            id: "0192a".to_string(),
            timestamp: Utc::now(),
            form_type: FormType::Expedition,
            is_test: true,
            fields,
            normalized: NormalizedContact {
                name: Some("Jean".to_string()),
                ..Default::default()
            },
            shipment: Some(ShipmentDetails {
                origin: Some("Abidjan".to_string()),
                ..Default::default()
            }),
            embed: None,
            files: vec![],
            ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        };

        let json = serde_json::to_string(&submission).unwrap();
        assert!(json.contains("\"formType\":\"expedition\""));
        assert!(json.contains("\"isTest\":true"));
        let parsed: Submission = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, submission);
        assert_eq!(parsed.text("nom"), Some("Jean"));
        assert!(!parsed.is_embedded());
    }

    #[test]
    fn test_normalized_contact_is_empty() {
        assert!(NormalizedContact::default().is_empty());
        let contact = NormalizedContact {
            email: Some("a@b.c".to_string()),
            ..Default::default()
        };
        assert!(!contact.is_empty());
    }
}
