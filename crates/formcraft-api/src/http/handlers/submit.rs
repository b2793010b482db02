//! Form tester endpoint: a direct model reply to a contact message.
//!
//! Unlike the collection pipeline, model failures surface here as errors so
//! the tester can see why a key or model does not work.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use formcraft_types::llm::GenerationRequest;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

const SUBMIT_MAX_OUTPUT_TOKENS: u32 = 400;
const SUBMIT_TEMPERATURE: f32 = 0.7;
const SUBMIT_TOP_P: f32 = 0.8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    pub model: Option<String>,
    /// Caller-supplied key, used instead of the configured one.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub status: &'static str,
    pub metadata: SubmitMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMetadata {
    pub model: String,
    pub api_key_used: String,
    pub timestamp: String,
}

/// POST /api/v1/submit - Reply to a test message with the chosen model.
pub async fn submit_message(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> Result<ApiResponse<SubmitResponse>, AppError> {
    let ctx = RequestContext::start();

    if [&body.name, &body.email, &body.message]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Tous les champs requis doivent être remplis".to_string(),
        ));
    }

    let caller_key = body.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty());
    let key = caller_key
        .or_else(|| state.config.gemini.usable_api_key())
        .ok_or_else(|| AppError::Validation("Clé API Gemini manquante".to_string()))?;
    let generator = state
        .generator_for_key(caller_key)
        .ok_or_else(|| AppError::Validation("Clé API Gemini manquante".to_string()))?;

    let model = body
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(state.config.gemini.model.as_str())
        .to_string();

    let request = GenerationRequest::new(build_submit_prompt(&body, &model), &model)
        .with_max_output_tokens(SUBMIT_MAX_OUTPUT_TOKENS)
        .with_temperature(SUBMIT_TEMPERATURE)
        .with_top_p(SUBMIT_TOP_P);

    let message = generator.generate(&request).await?;
    tracing::info!(model = %model, chars = message.len(), "tester reply generated");

    Ok(ctx.success(SubmitResponse {
        message,
        status: "success",
        metadata: SubmitMetadata {
            model,
            api_key_used: mask_key(key),
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    }))
}

pub fn build_submit_prompt(body: &SubmitRequest, model: &str) -> String {
    let name = body.name.trim();
    format!(
        "Tu es un assistant IA bienveillant et professionnel propulsé par {model}.

Informations de l'utilisateur :
- Nom : {name}
- Email : {email}
- Message : \"{message}\"

Instructions :
1. Réponds de manière gentille et professionnelle
2. Adresse-toi à l'utilisateur par son nom
3. Traite sa demande de façon utile et pertinente
4. Garde une tonalité chaleureuse mais professionnelle
5. Limite ta réponse à 300 mots maximum
6. Montre que tu comprends sa demande et propose une aide concrète

Réponds maintenant à {name} de manière personnalisée :",
        email = body.email.trim(),
        message = body.message.trim(),
    )
}

/// `AIzaSyAB...wxyz`: first 8 and last 4 characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AIzaSyABCDEFGHIJKLMNOPwxyz"), "AIzaSyAB...wxyz");
        assert_eq!(mask_key("short"), "***");
    }

    #[test]
    fn test_prompt_mentions_user() {
        let body = SubmitRequest {
            name: " Awa ".to_string(),
            email: "awa@example.com".to_string(),
            message: "Quels sont vos horaires ?".to_string(),
            model: None,
            api_key: None,
        };
        let prompt = build_submit_prompt(&body, "gemini-1.5-pro");
        assert!(prompt.contains("propulsé par gemini-1.5-pro"));
        assert!(prompt.contains("- Nom : Awa\n"));
        assert!(prompt.contains("\"Quels sont vos horaires ?\""));
        assert!(prompt.ends_with("Réponds maintenant à Awa de manière personnalisée :"));
    }
}
