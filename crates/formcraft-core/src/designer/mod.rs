//! Form designer: free-text specification to form schema.
//!
//! Generation goes through the model when a credential is configured and
//! always degrades to a canned template otherwise. The only error a caller
//! can see is a specification that fails the length check.

pub mod parse;
pub mod prompt;
pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use formcraft_types::config::DesignerConfig;
use formcraft_types::error::FormError;
use formcraft_types::form::{FallbackReason, FormSchema, FormType, GenerationMethod};
use formcraft_types::llm::{GenerationRequest, LlmError};

use crate::classify::classify_specification;
use crate::fallback::{reason_for_llm_error, reason_for_message};
use crate::llm::resilient::ResilientGenerator;

use self::parse::{SchemaError, parse_schema};
use self::prompt::build_design_prompt;
use self::templates::{customize, template_for};

/// Minimum specification length, in characters after trimming.
pub const MIN_SPECIFICATION_CHARS: usize = 10;

pub const DESIGN_MAX_OUTPUT_TOKENS: u32 = 1200;
pub const DESIGN_TEMPERATURE: f32 = 0.2;

/// `generatedBy` tag of model-generated forms.
pub const AI_GENERATOR_TAG: &str = "formcraft-ai";
/// `generatedBy` tag of template forms.
pub const FALLBACK_GENERATOR_TAG: &str = "formcraft-fallback";

/// Why the model path did not produce a schema.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DesignFailure {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Timeout - API trop lente (après {}s)", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DesignFailure {
    pub fn reason(&self) -> FallbackReason {
        match self {
            DesignFailure::Llm(error) => reason_for_llm_error(error),
            DesignFailure::Timeout(_) => FallbackReason::Timeout,
            DesignFailure::Schema(error) => reason_for_message(&error.to_string()),
        }
    }
}

/// Check the specification and return it trimmed.
pub fn validate_specification(specification: &str) -> Result<&str, FormError> {
    let trimmed = specification.trim();
    if trimmed.chars().count() < MIN_SPECIFICATION_CHARS {
        return Err(FormError::SpecificationTooShort {
            min: MIN_SPECIFICATION_CHARS,
        });
    }
    Ok(trimmed)
}

/// Generates form schemas from specifications.
#[derive(Debug, Clone)]
pub struct FormDesigner {
    generator: Option<Arc<ResilientGenerator>>,
    model: String,
    timeout: Duration,
}

impl FormDesigner {
    /// `generator` is `None` when no usable credential is configured.
    ///
    /// `timeout` bounds the whole generation call, retries included, and
    /// should be shorter than the retry budget.
    pub fn new(
        generator: Option<Arc<ResilientGenerator>>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(
        generator: Option<Arc<ResilientGenerator>>,
        model: impl Into<String>,
        config: &DesignerConfig,
    ) -> Self {
        Self::new(generator, model, Duration::from_secs(config.timeout_secs))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Design a form for `specification`.
    #[tracing::instrument(skip_all, fields(spec_chars = specification.chars().count()))]
    pub async fn design(&self, specification: &str) -> Result<FormSchema, FormError> {
        let specification = validate_specification(specification)?;
        let form_type = classify_specification(specification);

        let Some(generator) = &self.generator else {
            tracing::info!(form_type = %form_type, "no generation credential, using template");
            return Ok(fallback_schema(
                specification,
                form_type,
                GenerationMethod::HeuristicFallback,
                None,
            ));
        };

        match self.generate(generator, specification, form_type).await {
            Ok(mut schema) => {
                let generation_id = Uuid::now_v7().to_string();
                schema.id = Some(generation_id.clone());
                schema.metadata.method = Some(GenerationMethod::AiGenerated);
                schema.metadata.generated_by = Some(AI_GENERATOR_TAG.to_string());
                schema.metadata.timestamp = Some(Utc::now());
                schema.metadata.specification = Some(specification.to_string());
                schema.metadata.form_id = Some(generation_id);
                tracing::info!(
                    title = %schema.title,
                    fields = schema.fields.len(),
                    form_type = %schema.form_type(),
                    "form generated by model"
                );
                Ok(schema)
            }
            Err(failure) => {
                tracing::warn!(
                    error = %failure,
                    reason = %failure.reason(),
                    form_type = %form_type,
                    "form generation failed, using template"
                );
                Ok(fallback_schema(
                    specification,
                    form_type,
                    GenerationMethod::TemplateFallback,
                    Some(&failure),
                ))
            }
        }
    }

    /// Race the generation call against the timeout. The losing call is
    /// dropped, which cancels it.
    async fn generate(
        &self,
        generator: &ResilientGenerator,
        specification: &str,
        form_type: FormType,
    ) -> Result<FormSchema, DesignFailure> {
        let request = GenerationRequest::new(build_design_prompt(specification), &self.model)
            .with_max_output_tokens(DESIGN_MAX_OUTPUT_TOKENS)
            .with_temperature(DESIGN_TEMPERATURE);

        let text = tokio::time::timeout(self.timeout, generator.generate(&request))
            .await
            .map_err(|_| DesignFailure::Timeout(self.timeout))??;

        Ok(parse_schema(&text, form_type)?)
    }
}

/// Canned form for `form_type`, customized and tagged.
pub fn fallback_schema(
    specification: &str,
    form_type: FormType,
    method: GenerationMethod,
    failure: Option<&DesignFailure>,
) -> FormSchema {
    let mut schema = customize(template_for(form_type), specification);
    let generation_id = Uuid::now_v7().to_string();

    schema.id = Some(generation_id.clone());
    schema.metadata.method = Some(method);
    schema.metadata.generated_by = Some(FALLBACK_GENERATOR_TAG.to_string());
    schema.metadata.timestamp = Some(Utc::now());
    schema.metadata.specification = Some(specification.to_string());
    schema.metadata.form_id = Some(generation_id);
    if let Some(failure) = failure {
        schema.metadata.ai_error = Some(failure.to_string());
        schema.metadata.error_type = Some(failure.reason());
    }
    schema
}
