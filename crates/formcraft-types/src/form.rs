//! Form schema types.
//!
//! A [`FormSchema`] is what the form generator produces and what the embed
//! widget renders. The JSON shape (camelCase metadata under `_metadata`) is
//! shared with the stored `forms/{id}.json` blobs and with the generation
//! prompt, so the serde attributes here are part of the wire contract.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification tag for forms and submissions.
///
/// Parsing is total: any unrecognised tag becomes [`FormType::Custom`], so a
/// classification never resolves to "nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormType {
    Expedition,
    Restaurant,
    Devis,
    Contact,
    Inscription,
    Sondage,
    Candidature,
    Custom,
}

impl FormType {
    pub const ALL: [FormType; 8] = [
        FormType::Expedition,
        FormType::Restaurant,
        FormType::Devis,
        FormType::Contact,
        FormType::Inscription,
        FormType::Sondage,
        FormType::Candidature,
        FormType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Expedition => "expedition",
            FormType::Restaurant => "restaurant",
            FormType::Devis => "devis",
            FormType::Contact => "contact",
            FormType::Inscription => "inscription",
            FormType::Sondage => "sondage",
            FormType::Candidature => "candidature",
            FormType::Custom => "custom",
        }
    }

    /// Lenient parse used for hidden form fields and stored metadata.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .unwrap_or(FormType::Custom)
    }
}

impl Default for FormType {
    fn default() -> Self {
        FormType::Custom
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FormType {
    fn from(s: String) -> Self {
        FormType::from_tag(&s)
    }
}

impl From<FormType> for String {
    fn from(t: FormType) -> Self {
        t.as_str().to_string()
    }
}

/// Input type of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Select,
    Textarea,
    File,
    Date,
    Time,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::File => "file",
            FieldType::Date => "date",
            FieldType::Time => "time",
        };
        f.write_str(s)
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "tel" => Ok(FieldType::Tel),
            "number" => Ok(FieldType::Number),
            "select" => Ok(FieldType::Select),
            "textarea" => Ok(FieldType::Textarea),
            "file" => Ok(FieldType::File),
            "date" => Ok(FieldType::Date),
            "time" => Ok(FieldType::Time),
            other => Err(format!("invalid field type: '{other}'")),
        }
    }
}

/// A single field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FormField {
    /// Shorthand used by the canned templates.
    pub fn new(name: &str, field_type: FieldType, placeholder: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            placeholder: placeholder.to_string(),
            required,
            options: None,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(|o| o.to_string()).collect());
        self
    }
}

/// How a form schema came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMethod {
    /// Parsed and validated from the model output.
    AiGenerated,
    /// No usable credential: the template was chosen by keyword classification.
    HeuristicFallback,
    /// The model call or its output failed; the template replaced it.
    TemplateFallback,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMethod::AiGenerated => write!(f, "ai-generated"),
            GenerationMethod::HeuristicFallback => write!(f, "heuristic-fallback"),
            GenerationMethod::TemplateFallback => write!(f, "template-fallback"),
        }
    }
}

/// Coarse category of an upstream failure, shown to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackReason {
    Overload,
    Permission,
    Quota,
    Timeout,
    Unknown,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Overload => write!(f, "overload"),
            FallbackReason::Permission => write!(f, "permission"),
            FallbackReason::Quota => write!(f, "quota"),
            FallbackReason::Timeout => write!(f, "timeout"),
            FallbackReason::Unknown => write!(f, "unknown"),
        }
    }
}

/// Metadata attached to every form schema (serialized as `_metadata`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    pub form_type: FormType,
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<GenerationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    /// Legacy generation id, matched by the embed lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<FallbackReason>,
}

impl FormMetadata {
    pub fn new(form_type: FormType, cta: impl Into<String>) -> Self {
        Self {
            form_type,
            cta: cta.into(),
            cta_secondary: None,
            method: None,
            generated_by: None,
            timestamp: None,
            specification: None,
            form_id: None,
            ai_error: None,
            error_type: None,
        }
    }
}

/// A complete form definition.
///
/// Invariant: `fields` is never empty for a schema produced by the form
/// generator (validated output or canned template).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<FormField>,
    #[serde(rename = "_metadata")]
    pub metadata: FormMetadata,
}

impl FormSchema {
    pub fn form_type(&self) -> FormType {
        self.metadata.form_type
    }
}

/// A form schema persisted in the blob store.
///
/// The `id` of the inner schema is always set once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedForm {
    #[serde(flatten)]
    pub schema: FormSchema,
    pub created_at: DateTime<Utc>,
}

impl SavedForm {
    pub fn id(&self) -> &str {
        self.schema.id.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> FormSchema {
        FormSchema {
            id: Some("0192".to_string()),
            title: "Formulaire de Contact".to_string(),
            description: "Contactez-nous".to_string(),
            fields: vec![
                FormField::new("nom", FieldType::Text, "Votre nom", true),
                FormField::new("budget", FieldType::Select, "Budget", false)
                    .with_options(&["< 1000€", "> 1000€"]),
            ],
            metadata: FormMetadata::new(FormType::Contact, "Envoyer le Message"),
        }
    }

    #[test]
    fn test_form_type_parse_is_total() {
        assert_eq!(FormType::from_tag("expedition"), FormType::Expedition);
        assert_eq!(FormType::from_tag("  DEVIS "), FormType::Devis);
        assert_eq!(FormType::from_tag("anything-else"), FormType::Custom);
        assert_eq!(FormType::from_tag(""), FormType::Custom);
    }

    #[test]
    fn test_form_type_serde_as_string() {
        let json = serde_json::to_string(&FormType::Restaurant).unwrap();
        assert_eq!(json, "\"restaurant\"");
        let parsed: FormType = serde_json::from_str("\"unheard-of\"").unwrap();
        assert_eq!(parsed, FormType::Custom);
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("textarea".parse::<FieldType>().unwrap(), FieldType::Textarea);
        assert!("checkbox".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_schema_wire_shape() {
        let value = serde_json::to_value(sample_schema()).unwrap();
        assert_eq!(value["fields"][0]["type"], "text");
        assert_eq!(value["_metadata"]["formType"], "contact");
        assert_eq!(value["_metadata"]["cta"], "Envoyer le Message");
        assert!(value["_metadata"].get("ctaSecondary").is_none());
        assert!(value["fields"][0].get("options").is_none());
    }

    #[test]
    fn test_saved_form_flattens_schema() {
        let saved = SavedForm {
            schema: sample_schema(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&saved).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "0192");
        assert!(value.get("createdAt").is_some());

        let parsed: SavedForm = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, saved);
        assert_eq!(parsed.id(), "0192");
    }

    #[test]
    fn test_generation_method_serde() {
        let json = serde_json::to_string(&GenerationMethod::HeuristicFallback).unwrap();
        assert_eq!(json, "\"heuristic-fallback\"");
        assert_eq!(GenerationMethod::TemplateFallback.to_string(), "template-fallback");
    }
}
