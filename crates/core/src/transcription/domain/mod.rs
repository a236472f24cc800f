pub mod speech_recognizer;
pub mod transcription_error;
