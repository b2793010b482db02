//! Parsing and validation of model-produced form schemas.
//!
//! Model output is untrusted text: it may be wrapped in code fences, carry
//! prose around the JSON, use unknown field types or odd field names. The
//! parser extracts the outermost JSON object, rejects structurally unusable
//! output and normalizes the rest. Parsing an already valid schema's JSON
//! yields the same schema.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use formcraft_types::form::{FieldType, FormField, FormMetadata, FormSchema, FormType};

use super::templates::default_cta;

/// Why model output could not be turned into a schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("JSON invalide: {0}")]
    InvalidJson(String),

    #[error("Format invalide: {0}")]
    InvalidFormat(&'static str),

    #[error("Champ invalide (index {index}): {reason}")]
    InvalidField { index: usize, reason: &'static str },
}

/// Parse and validate a schema from raw model output.
///
/// `fallback_type` fills a missing `_metadata.formType`.
pub fn parse_schema(raw: &str, fallback_type: FormType) -> Result<FormSchema, SchemaError> {
    let json = extract_json(raw);
    let value: Value =
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or(SchemaError::InvalidFormat("objet JSON attendu"))?;

    let title = non_empty_str(object.get("title"))
        .ok_or(SchemaError::InvalidFormat("titre manquant"))?
        .to_string();

    let raw_fields = object
        .get("fields")
        .and_then(Value::as_array)
        .ok_or(SchemaError::InvalidFormat("liste de champs manquante"))?;
    if raw_fields.is_empty() {
        return Err(SchemaError::InvalidFormat("liste de champs vide"));
    }
    let fields = raw_fields
        .iter()
        .enumerate()
        .map(|(index, field)| parse_field(index, field))
        .collect::<Result<Vec<_>, _>>()?;

    let description = object
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let id = match object.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let empty = Map::new();
    let metadata = object
        .get("_metadata")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Ok(FormSchema {
        id,
        title,
        description,
        fields,
        metadata: parse_metadata(metadata, fallback_type),
    })
}

/// Strip code fences and cut to the outermost `{ ... }`.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.trim_end().strip_suffix("```").unwrap_or(trimmed);

    let start = trimmed.find('{').unwrap_or(0);
    let end = trimmed
        .rfind('}')
        .filter(|end| *end >= start)
        .map(|end| end + 1)
        .unwrap_or(trimmed.len());
    &trimmed[start..end]
}

fn parse_field(index: usize, value: &Value) -> Result<FormField, SchemaError> {
    let invalid = |reason| SchemaError::InvalidField { index, reason };
    let object = value.as_object().ok_or(invalid("objet attendu"))?;

    let name = non_empty_str(object.get("name")).ok_or(invalid("nom manquant"))?;
    let field_type = non_empty_str(object.get("type")).ok_or(invalid("type manquant"))?;
    let placeholder =
        non_empty_str(object.get("placeholder")).ok_or(invalid("placeholder manquant"))?;

    let options = object.get("options").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    });

    Ok(FormField {
        name: normalize_field_name(name),
        field_type: field_type.parse().unwrap_or(FieldType::Text),
        placeholder: placeholder.to_string(),
        required: object.get("required").is_some_and(is_truthy),
        options,
    })
}

fn parse_metadata(metadata: &Map<String, Value>, fallback_type: FormType) -> FormMetadata {
    let form_type = non_empty_str(metadata.get("formType"))
        .map(FormType::from_tag)
        .unwrap_or(fallback_type);

    let (default_primary, default_secondary) = default_cta(form_type);
    let given_secondary = non_empty_str(metadata.get("ctaSecondary")).map(str::to_string);
    let (cta, cta_secondary) = match non_empty_str(metadata.get("cta")) {
        Some(cta) => (cta.to_string(), given_secondary),
        None => (
            default_primary.to_string(),
            given_secondary.or_else(|| default_secondary.map(str::to_string)),
        ),
    };

    FormMetadata {
        form_type,
        cta,
        cta_secondary,
        method: typed(metadata, "method"),
        generated_by: typed(metadata, "generatedBy"),
        timestamp: typed(metadata, "timestamp"),
        specification: typed(metadata, "specification"),
        form_id: typed(metadata, "formId"),
        ai_error: typed(metadata, "aiError"),
        error_type: typed(metadata, "errorType"),
    }
}

/// Lowercase and replace anything outside `[a-z0-9_]` with `_`.
pub fn normalize_field_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// JavaScript-style truthiness, as the model tends to emit `"true"` or `1`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Deserialize an optional metadata key, ignoring values of the wrong shape.
fn typed<T: DeserializeOwned>(metadata: &Map<String, Value>, key: &str) -> Option<T> {
    metadata
        .get(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
