use super::audio_segment::AudioSegment;

/// Default chunk length: five minutes.
pub const DEFAULT_CHUNK_DURATION_MS: u64 = 5 * 60 * 1000;

/// Splits decoded audio into contiguous, fixed-duration slices.
///
/// Slices cover the whole input with no gaps or overlaps; only the final
/// slice may be shorter than the configured duration.
#[derive(Clone, Copy, Debug)]
pub struct AudioChunker {
    chunk_duration_ms: u64,
}

impl AudioChunker {
    pub fn new(chunk_duration_ms: u64) -> Result<Self, &'static str> {
        if chunk_duration_ms == 0 {
            return Err("chunk_duration_ms must be > 0");
        }
        Ok(Self { chunk_duration_ms })
    }

    pub fn chunk_duration_ms(&self) -> u64 {
        self.chunk_duration_ms
    }

    pub fn split(&self, audio: &AudioSegment) -> Vec<AudioSegment> {
        let total = audio.frame_count();
        // A sample rate below 1 kHz could round a short chunk down to zero frames.
        let step = audio.frames_for_ms(self.chunk_duration_ms).max(1);

        (0..total)
            .step_by(step)
            .map(|start| audio.slice_frames(start, start + step))
            .collect()
    }
}

impl Default for AudioChunker {
    fn default() -> Self {
        Self {
            chunk_duration_ms: DEFAULT_CHUNK_DURATION_MS,
        }
    }
}
