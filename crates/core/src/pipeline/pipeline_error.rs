use thiserror::Error;

use crate::audio::domain::audio_error::AudioError;
use crate::shared::uploaded_audio::UploadError;
use crate::transcription::domain::transcription_error::TranscriptionError;
use crate::translation::domain::translation_error::TranslationError;

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(
        "File size ({:.1} MB) exceeds the limit of {:.0} MB",
        megabytes(.size_bytes),
        megabytes(.limit_bytes)
    )]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{0} contains no audio stream")]
    NoAudio(String),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error("failed to prepare temporary audio files: {0}")]
    TempFile(#[source] std::io::Error),
}

impl PipelineError {
    /// Input validation failures that are reported to the user as-is.
    /// Everything else is an unrecoverable processing failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::FileTooLarge { .. }
                | PipelineError::Upload(_)
                | PipelineError::NoAudio(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large_message() {
        let err = PipelineError::FileTooLarge {
            size_bytes: 30 * 1024 * 1024,
            limit_bytes: 25 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File size (30.0 MB) exceeds the limit of 25 MB"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_remote_errors_are_not_input_errors() {
        let err = PipelineError::from(TranslationError::EmptyChoices);
        assert!(!err.is_input_error());
        let err = PipelineError::from(TranscriptionError::Api {
            status: 401,
            body: "bad key".to_string(),
        });
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("401"));
    }
}
