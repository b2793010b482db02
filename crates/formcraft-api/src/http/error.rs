//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use formcraft_types::error::{FormError, StorageError, SubmissionError};
use formcraft_types::llm::LlmError;

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Form(FormError),
    Submission(SubmissionError),
    Storage(StorageError),
    /// A direct model call failed (form tester only; other paths fall back).
    Generation(LlmError),
    Validation(String),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        AppError::Form(e)
    }
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        AppError::Submission(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Generation(e)
    }
}

/// User-facing message for a failed direct model call.
pub fn generation_message(error: &LlmError) -> String {
    match error {
        LlmError::PermissionDenied(_) => "Accès refusé. Vérifiez votre clé API Gemini.".to_string(),
        LlmError::QuotaExceeded(_) => "Quota API dépassé. Veuillez réessayer plus tard.".to_string(),
        LlmError::Overloaded(_) | LlmError::CircuitOpen => {
            "Le service IA est temporairement surchargé. Veuillez réessayer plus tard.".to_string()
        }
        LlmError::InvalidRequest(message) => message.clone(),
        LlmError::EmptyResponse | LlmError::Api(_) => "Erreur interne du serveur".to_string(),
    }
}

impl AppError {
    /// Error code and message for the envelope.
    pub fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Form(e @ (FormError::SpecificationTooShort { .. } | FormError::Invalid(_))) => {
                ("VALIDATION_ERROR", e.to_string())
            }
            AppError::Form(FormError::NotFound(id)) => {
                ("FORM_NOT_FOUND", format!("Formulaire introuvable: {id}"))
            }
            AppError::Form(FormError::Storage(e))
            | AppError::Submission(SubmissionError::Storage(e)) => ("STORAGE_ERROR", e.to_string()),
            AppError::Submission(e @ SubmissionError::MissingContact) => {
                ("VALIDATION_ERROR", e.to_string())
            }
            AppError::Storage(StorageError::NotFound(path)) => {
                ("BLOB_NOT_FOUND", format!("Fichier introuvable: {path}"))
            }
            AppError::Storage(e @ StorageError::InvalidPath(_)) => ("VALIDATION_ERROR", e.to_string()),
            AppError::Storage(e) => ("STORAGE_ERROR", e.to_string()),
            AppError::Generation(e @ LlmError::InvalidRequest(_)) => {
                ("VALIDATION_ERROR", generation_message(e))
            }
            AppError::Generation(e) => ("GENERATION_ERROR", generation_message(e)),
            AppError::Validation(message) => ("VALIDATION_ERROR", message.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        if code == "STORAGE_ERROR" {
            tracing::error!(code, error = %message, "request failed");
        } else {
            tracing::debug!(code, error = %message, "request rejected");
        }

        let request_id = uuid::Uuid::now_v7().to_string();
        ApiResponse::error(code, &message, request_id, 0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn status(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status(FormError::SpecificationTooShort { min: 10 }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(FormError::NotFound("x".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(SubmissionError::MissingContact.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(FormError::Storage(StorageError::Io("disk".to_string())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(StorageError::InvalidPath("../x".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(LlmError::QuotaExceeded("429".to_string()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(LlmError::InvalidRequest("Modèle non autorisé: x".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_codes() {
        let (code, message) = AppError::from(FormError::SpecificationTooShort { min: 10 }).code_and_message();
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "Description trop courte (minimum 10 caractères)");

        let (code, _) = AppError::from(FormError::NotFound("x".to_string())).code_and_message();
        assert_eq!(code, "FORM_NOT_FOUND");

        let (_, message) =
            AppError::from(LlmError::PermissionDenied("403".to_string())).code_and_message();
        assert!(message.contains("Vérifiez votre clé API"));
    }
}
