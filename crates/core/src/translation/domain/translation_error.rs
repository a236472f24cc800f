use thiserror::Error;

use crate::shared::api_endpoint::is_retryable_status;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("translation service returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to decode translation response: {0}")]
    Decode(String),
    #[error("translation response contained no choices")]
    EmptyChoices,
}

impl TranslationError {
    /// Status code of a service-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TranslationError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether sending the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Api { status, .. } => is_retryable_status(*status),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_final() {
        let err = TranslationError::Api {
            status: 401,
            body: "invalid api key".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        let rate_limited = TranslationError::Api {
            status: 429,
            body: String::new(),
        };
        assert!(rate_limited.is_retryable());
        assert!(TranslationError::EmptyChoices.is_retryable());
        assert!(TranslationError::Decode("truncated".to_string()).is_retryable());
    }
}
