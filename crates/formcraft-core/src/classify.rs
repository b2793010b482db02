//! Form-type classification.
//!
//! Specifications are classified with an ordered keyword table: rules are
//! evaluated top to bottom and the first rule with a matching keyword wins.
//! Overlapping keywords (a "devis" request mentioning "Paris") therefore
//! resolve by table order, never by match count.

use formcraft_types::form::FormType;
use formcraft_types::submission::SubmissionFields;

use crate::heuristics::find_field;

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub form_type: FormType,
    /// Lowercase substrings; any one of them selects the rule.
    pub keywords: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

/// Specification classification rules, in evaluation order.
pub const SPECIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        form_type: FormType::Expedition,
        keywords: &["expédi", "colis", "abidjan", "paris", "envoi", "transport"],
    },
    ClassificationRule {
        form_type: FormType::Restaurant,
        keywords: &["restaurant", "table", "réserv", "repas", "dîner"],
    },
    ClassificationRule {
        form_type: FormType::Devis,
        keywords: &["devis", "prix", "tarif", "coût"],
    },
    ClassificationRule {
        form_type: FormType::Contact,
        keywords: &["contact", "message", "question"],
    },
];

/// Tag used when no specification rule matches.
pub const DEFAULT_SPECIFICATION_TYPE: FormType = FormType::Contact;

/// Classify a free-text form specification.
pub fn classify_specification(specification: &str) -> FormType {
    classify_with(SPECIFICATION_RULES, specification, DEFAULT_SPECIFICATION_TYPE)
}

/// Evaluate `rules` in order against the lowercased `text`.
pub fn classify_with(rules: &[ClassificationRule], text: &str, default: FormType) -> FormType {
    let haystack = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&haystack))
        .map(|rule| rule.form_type)
        .unwrap_or(default)
}

/// Fields whose presence marks a submission as a shipment request.
pub const SHIPMENT_MARKER_FIELDS: &[&str] = &["ville_origine", "poids_colis"];

/// Whether a submission should be treated as a shipment request.
pub fn is_shipment(form_type: FormType, fields: &SubmissionFields) -> bool {
    form_type == FormType::Expedition
        || SHIPMENT_MARKER_FIELDS
            .iter()
            .any(|marker| find_field(fields, &[*marker]).is_some())
}

/// Final classification of a submission given the hinted or stored tag.
pub fn classify_submission(hint: Option<FormType>, fields: &SubmissionFields) -> FormType {
    let hinted = hint.unwrap_or(FormType::Custom);
    if is_shipment(hinted, fields) {
        FormType::Expedition
    } else {
        hinted
    }
}
