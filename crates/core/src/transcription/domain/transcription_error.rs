use thiserror::Error;

use crate::shared::api_endpoint::is_retryable_status;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("transcription service returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to read transcription response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("audio payload too large: {size_bytes} bytes (limit {limit_bytes} bytes)")]
    PayloadTooLarge { size_bytes: usize, limit_bytes: usize },
}

impl TranscriptionError {
    /// Status code of a service-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TranscriptionError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether sending the same request again could succeed. Oversized
    /// payloads and client errors other than timeouts and rate limits are
    /// final.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranscriptionError::PayloadTooLarge { .. } => false,
            TranscriptionError::Api { status, .. } => is_retryable_status(*status),
            TranscriptionError::Request(_) | TranscriptionError::Body(_) => true,
        }
    }
}
