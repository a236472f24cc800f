use std::io::Cursor;

use crate::audio::domain::audio_encoder::{AudioEncoder, EncodedAudio};
use crate::audio::domain::audio_error::AudioError;
use crate::audio::domain::audio_segment::AudioSegment;

const WAV_MIME_TYPE: &str = "audio/wav";

/// Encodes segments as 16-bit PCM WAV in memory using hound.
pub struct WavEncoder;

impl AudioEncoder for WavEncoder {
    fn encode(&self, audio: &AudioSegment, index: usize) -> Result<EncodedAudio, AudioError> {
        let spec = hound::WavSpec {
            channels: audio.channels(),
            sample_rate: audio.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let encode_err = |e: hound::Error| AudioError::Encode(e.to_string());

        let mut cursor = Cursor::new(Vec::with_capacity(audio.samples().len() * 2 + 44));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(encode_err)?;
            for &sample in audio.samples() {
                writer
                    .write_sample(to_i16(sample))
                    .map_err(encode_err)?;
            }
            writer.finalize().map_err(encode_err)?;
        }

        Ok(EncodedAudio::new(
            cursor.into_inner(),
            format!("chunk_{index:04}.wav"),
            WAV_MIME_TYPE,
        ))
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
