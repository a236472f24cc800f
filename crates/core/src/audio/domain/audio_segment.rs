/// A segment of decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of sample frames (one sample per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Exact duration in milliseconds for frame counts that land on a
    /// millisecond boundary, truncated otherwise.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frame_count() as u64 * 1000 / self.sample_rate as u64
    }

    /// Number of frames spanning `ms` milliseconds at this sample rate.
    pub fn frames_for_ms(&self, ms: u64) -> usize {
        (ms * self.sample_rate as u64 / 1000) as usize
    }

    /// Copy of the frames in `[start_frame, end_frame)`, clamped to the segment.
    pub fn slice_frames(&self, start_frame: usize, end_frame: usize) -> AudioSegment {
        let channels = self.channels.max(1) as usize;
        let total = self.frame_count();
        let start = start_frame.min(total) * channels;
        let end = end_frame.clamp(start_frame.min(total), total) * channels;
        AudioSegment::new(
            self.samples[start..end].to_vec(),
            self.sample_rate,
            self.channels,
        )
    }
}
