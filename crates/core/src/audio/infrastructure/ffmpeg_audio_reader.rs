use std::path::Path;

use crate::audio::domain::audio_error::AudioError;
use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_segment::AudioSegment;

/// Decodes the best audio stream of a file (mp3 or any ffmpeg-supported
/// container) using ffmpeg-next, resampled to mono f32.
///
/// Files without an audio stream yield `Ok(None)`. Unreadable input, and an
/// audio stream that decodes to nothing, are `AudioError::Decode`.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, AudioError> {
        let decode_err = |e: ffmpeg_next::Error| AudioError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        ffmpeg_next::init().map_err(decode_err)?;

        let mut ictx = ffmpeg_next::format::input(path).map_err(decode_err)?;

        let audio_stream = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
            Some(stream) => stream,
            None => return Ok(None),
        };

        let audio_stream_index = audio_stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(
            audio_stream.parameters(),
        )
        .map_err(decode_err)?;
        let mut decoder = codec_ctx.decoder().audio().map_err(decode_err)?;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )
        .map_err(decode_err)?;

        log::debug!(
            "Decoding {} ({} Hz, {} ch) to {} Hz mono",
            path.display(),
            decoder.rate(),
            decoder.channels(),
            target_sample_rate
        );

        let mut all_samples: Vec<f32> = Vec::new();
        let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
        let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet).map_err(decode_err)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resampler
                    .run(&decoded_frame, &mut resampled_frame)
                    .map_err(decode_err)?;
                extract_f32_samples(&resampled_frame, &mut all_samples);
            }
        }

        decoder.send_eof().map_err(decode_err)?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler
                .run(&decoded_frame, &mut resampled_frame)
                .map_err(decode_err)?;
            extract_f32_samples(&resampled_frame, &mut all_samples);
        }

        // The resampler may still hold buffered samples
        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                extract_f32_samples(&resampled_frame, &mut all_samples);
            }
        }

        if all_samples.is_empty() {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                message: "audio stream contains no decodable samples".to_string(),
            });
        }

        Ok(Some(AudioSegment::new(all_samples, target_sample_rate, 1)))
    }
}

/// Extract f32 samples from a planar mono resampled frame.
fn extract_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}
