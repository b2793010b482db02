//! Reply generation for collected submissions.
//!
//! The reply is produced by the model when possible and by a deterministic
//! template otherwise. Upstream failures never escape this module.

use std::sync::Arc;

use formcraft_types::form::{FallbackReason, FormType};
use formcraft_types::llm::GenerationRequest;
use formcraft_types::submission::{ReplyMethod, Submission};

use crate::classify::is_shipment;
use crate::fallback::reason_for_llm_error;
use crate::heuristics::{FieldRole, display_name, find_role};
use crate::llm::resilient::ResilientGenerator;

pub const REPLY_MAX_OUTPUT_TOKENS: u32 = 300;
pub const REPLY_TEMPERATURE: f32 = 0.7;
pub const REPLY_TOP_P: f32 = 0.8;

/// A reply to show the submitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub method: ReplyMethod,
    /// Set when the model call was attempted and failed.
    pub reason: Option<FallbackReason>,
}

impl Reply {
    fn fallback(submission: &Submission, reason: Option<FallbackReason>) -> Self {
        Self {
            text: fallback_reply(submission),
            method: ReplyMethod::Fallback,
            reason,
        }
    }
}

/// Produces reply text for submissions.
#[derive(Debug, Clone)]
pub struct SubmissionResponder {
    generator: Option<Arc<ResilientGenerator>>,
    model: String,
}

impl SubmissionResponder {
    /// `generator` is `None` when no usable credential is configured.
    pub fn new(generator: Option<Arc<ResilientGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Reply to `submission`. Never fails.
    #[tracing::instrument(skip_all, fields(submission_id = %submission.id, form_type = %submission.form_type))]
    pub async fn respond(&self, submission: &Submission, context_hint: &str) -> Reply {
        let Some(generator) = &self.generator else {
            tracing::debug!("no generation credential configured, using fallback reply");
            return Reply::fallback(submission, None);
        };

        if generator.breaker().is_open() {
            tracing::info!("circuit breaker open, using fallback reply");
            return Reply::fallback(submission, Some(FallbackReason::Overload));
        }

        let request = GenerationRequest::new(build_reply_prompt(submission, context_hint), &self.model)
            .with_max_output_tokens(REPLY_MAX_OUTPUT_TOKENS)
            .with_temperature(REPLY_TEMPERATURE)
            .with_top_p(REPLY_TOP_P);

        match generator.generate(&request).await {
            Ok(text) => Reply {
                text,
                method: ReplyMethod::Ai,
                reason: None,
            },
            Err(error) => {
                let reason = reason_for_llm_error(&error);
                tracing::warn!(error = %error, reason = %reason, "reply generation failed, using fallback");
                Reply::fallback(submission, Some(reason))
            }
        }
    }
}

/// Per-type instruction prepended to the reply prompt.
pub fn context_hint(submission: &Submission) -> String {
    let mut hint = String::new();
    if let Some(domain) = submission.embed.as_ref().and_then(|e| e.domain.as_deref()) {
        hint.push_str(&format!(
            "Cette soumission provient d'un formulaire intégré sur {domain}. "
        ));
    }
    hint.push_str(match submission.form_type {
        FormType::Sondage => "Analyse ce sondage de satisfaction et remercie chaleureusement.",
        FormType::Devis => "Traite cette demande de devis professionnellement.",
        FormType::Candidature => "Réponds à cette candidature avec professionnalisme.",
        FormType::Inscription => "Confirme cette inscription à l'événement.",
        FormType::Expedition => "Traite cette demande d'expédition de colis.",
        _ => "Traite cette soumission de formulaire de manière professionnelle.",
    });
    hint
}

/// Build the reply prompt; shipment submissions get a dedicated brief.
pub fn build_reply_prompt(submission: &Submission, context_hint: &str) -> String {
    let data = serde_json::json!({
        "formType": submission.form_type,
        "fields": submission.fields,
        "name": submission.normalized.name,
        "email": submission.normalized.email,
        "message": submission.normalized.message,
        "context": context_hint,
    });
    let data = serde_json::to_string_pretty(&data).unwrap_or_default();

    let mut prompt = format!(
        "Tu es un agent intelligent spécialisé dans le service client. \
         Analyse cette soumission et génère une réponse personnalisée.\n\n\
         Données reçues:\n{data}\n\n"
    );

    if is_shipment(submission.form_type, &submission.fields) {
        prompt.push_str(
            "CONTEXTE SPÉCIAL - EXPÉDITION DE COLIS:\n\
             Cette demande concerne l'expédition d'un colis.\n\n\
             Instructions spéciales:\n\
             1. Confirme la réception de la demande d'expédition\n\
             2. Récapitule les détails : origine, destination, poids\n\
             3. Mentionne que l'équipe va calculer le devis\n\
             4. Donne un délai de réponse (ex: \"sous 2h\")\n\
             5. Sois professionnel mais chaleureux\n\
             6. Maximum 200 mots\n\n",
        );
    } else {
        prompt.push_str(
            "Instructions générales:\n\
             1. Analyse le type de formulaire et les données\n\
             2. Génère une réponse personnalisée et professionnelle\n\
             3. Si c'est un contact: remercie et indique un délai de réponse\n\
             4. Si c'est un devis: confirme la réception et les prochaines étapes\n\
             5. Si c'est une inscription: confirme l'inscription et donne les détails\n\
             6. Sois chaleureux mais professionnel\n\
             7. Maximum 200 mots\n\n",
        );
    }

    prompt.push_str("Réponds maintenant de manière personnalisée:");
    prompt
}

/// Deterministic reply used whenever the model is unavailable.
pub fn fallback_reply(submission: &Submission) -> String {
    let name = display_name(&submission.fields);

    if is_shipment(submission.form_type, &submission.fields) {
        let origin = find_role(&submission.fields, FieldRole::Origin)
            .unwrap_or_else(|| "votre ville".to_string());
        let destination = find_role(&submission.fields, FieldRole::Destination)
            .unwrap_or_else(|| "la destination".to_string());
        let weight = find_role(&submission.fields, FieldRole::Weight)
            .map(|w| format!("{w}kg"))
            .unwrap_or_else(|| "votre colis".to_string());
        return format!(
            "Bonjour {name}, nous avons bien reçu votre demande d'expédition de {origin} vers \
             {destination}. Notre équipe calcule le meilleur tarif pour votre envoi de {weight}. \
             Vous recevrez votre devis sous 2h ! 📦✈️"
        );
    }

    match submission.form_type {
        FormType::Devis => format!(
            "Bonjour {name}, merci pour votre demande de devis ! Notre équipe commerciale étudie \
             votre projet et vous recontactera sous 24h avec une proposition personnalisée. 💼"
        ),
        FormType::Contact => format!(
            "Bonjour {name}, merci pour votre message ! Nous avons bien reçu votre demande et \
             notre équipe vous recontactera dans les plus brefs délais. 📧"
        ),
        FormType::Inscription => format!(
            "Bonjour {name}, votre inscription a été prise en compte ! Vous recevrez un email de \
             confirmation avec tous les détails dans quelques minutes. 🎫"
        ),
        _ => format!(
            "Bonjour {name}, merci pour votre soumission ! Nous avons bien reçu vos informations \
             et vous recontacterons bientôt. 📧"
        ),
    }
}
