//! Mapping of upstream failures to the reason shown alongside degraded output.

use formcraft_types::form::FallbackReason;
use formcraft_types::llm::LlmError;

/// Categorize a generation error.
///
/// Typed kinds map directly; anything else is categorized from its message.
pub fn reason_for_llm_error(error: &LlmError) -> FallbackReason {
    match error {
        LlmError::Overloaded(_) | LlmError::CircuitOpen => FallbackReason::Overload,
        LlmError::PermissionDenied(_) => FallbackReason::Permission,
        LlmError::QuotaExceeded(_) => FallbackReason::Quota,
        other => reason_for_message(&other.to_string()),
    }
}

/// Categorize an error message by the HTTP status code it mentions.
pub fn reason_for_message(message: &str) -> FallbackReason {
    if message.contains("503") {
        FallbackReason::Overload
    } else if message.contains("403") {
        FallbackReason::Permission
    } else if message.contains("429") {
        FallbackReason::Quota
    } else {
        FallbackReason::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_errors_map_directly() {
        assert_eq!(
            reason_for_llm_error(&LlmError::Overloaded("busy".to_string())),
            FallbackReason::Overload
        );
        assert_eq!(
            reason_for_llm_error(&LlmError::PermissionDenied("bad key".to_string())),
            FallbackReason::Permission
        );
        assert_eq!(
            reason_for_llm_error(&LlmError::QuotaExceeded("slow down".to_string())),
            FallbackReason::Quota
        );
        assert_eq!(
            reason_for_llm_error(&LlmError::CircuitOpen),
            FallbackReason::Overload
        );
    }

    #[test]
    fn test_generic_errors_use_status_codes() {
        assert_eq!(
            reason_for_llm_error(&LlmError::Api("HTTP 503 Service Unavailable".to_string())),
            FallbackReason::Overload
        );
        assert_eq!(
            reason_for_llm_error(&LlmError::Api("HTTP 429".to_string())),
            FallbackReason::Quota
        );
        assert_eq!(
            reason_for_llm_error(&LlmError::EmptyResponse),
            FallbackReason::Unknown
        );
        assert_eq!(reason_for_message("JSON invalide"), FallbackReason::Unknown);
    }
}
