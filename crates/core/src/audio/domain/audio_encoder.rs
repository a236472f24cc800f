use super::audio_error::AudioError;
use super::audio_segment::AudioSegment;

/// An audio payload ready to be sent to a remote service.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl EncodedAudio {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Domain interface for encoding a decoded segment into a transmittable container.
pub trait AudioEncoder: Send + Sync {
    /// `index` is the chunk position, used to give each payload a distinct file name.
    fn encode(&self, audio: &AudioSegment, index: usize) -> Result<EncodedAudio, AudioError>;
}
