use crate::audio::domain::audio_encoder::EncodedAudio;

use super::transcription_error::TranscriptionError;

/// Domain interface for speech-to-text transcription.
///
/// One call transcribes one audio unit (a whole upload or a single chunk)
/// and returns the recognized text verbatim.
pub trait SpeechRecognizer: Send + Sync {
    fn transcribe(&self, audio: &EncodedAudio) -> Result<String, TranscriptionError>;
}
