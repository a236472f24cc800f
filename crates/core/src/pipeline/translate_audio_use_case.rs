use std::fmt;
use std::time::Instant;

use crate::audio::domain::audio_chunker::AudioChunker;
use crate::audio::domain::audio_encoder::{AudioEncoder, EncodedAudio};
use crate::audio::domain::audio_reader::AudioReader;
use crate::script::domain::script_normalizer::ScriptNormalizer;
use crate::shared::config::{AppConfig, OversizePolicy};
use crate::shared::constants::TRANSCRIPTION_SAMPLE_RATE;
use crate::shared::uploaded_audio::UploadedAudio;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::translation::domain::target_language::TargetLanguage;
use crate::translation::domain::text_chunker::TextChunker;
use crate::translation::domain::translator::{translate_large_text, Translator};

use super::pipeline_error::PipelineError;
use super::pipeline_logger::{PipelineLogger, PipelineStage};

/// Which path the orchestrator took for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Upload within the size threshold, sent to the recognizer whole.
    SinglePass,
    /// Oversized upload, decoded and processed in fixed-duration chunks.
    Chunked,
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::SinglePass => write!(f, "single pass"),
            ProcessingMode::Chunked => write!(f, "chunked"),
        }
    }
}

/// Result of one upload: the texts shown side by side to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub transcript: String,
    pub translation: String,
    pub mode: ProcessingMode,
    /// Number of audio pieces sent for transcription (1 for a single pass).
    pub chunk_count: usize,
}

/// Tunables for a run, separate from the injected services.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub target: TargetLanguage,
    pub max_upload_bytes: u64,
    pub oversize_policy: OversizePolicy,
    pub audio_chunker: AudioChunker,
    pub text_chunker: TextChunker,
}

impl TranslateOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        let settings = config.settings();
        Self {
            target: settings.target_language,
            max_upload_bytes: settings.max_upload_bytes,
            oversize_policy: settings.oversize_policy,
            audio_chunker: config.audio_chunker(),
            text_chunker: config.text_chunker(),
        }
    }
}

/// Turns one uploaded recording into a transcript and its translation.
///
/// Uploads within the size threshold are transcribed in a single request.
/// Larger ones are either rejected up front or decoded, cut into
/// fixed-duration pieces and handled one piece at a time, in order. Script
/// normalization runs once over the full translation.
pub struct TranslateAudioUseCase {
    reader: Box<dyn AudioReader>,
    encoder: Box<dyn AudioEncoder>,
    recognizer: Box<dyn SpeechRecognizer>,
    translator: Box<dyn Translator>,
    normalizer: Box<dyn ScriptNormalizer>,
    logger: Box<dyn PipelineLogger>,
    options: TranslateOptions,
}

impl TranslateAudioUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        encoder: Box<dyn AudioEncoder>,
        recognizer: Box<dyn SpeechRecognizer>,
        translator: Box<dyn Translator>,
        normalizer: Box<dyn ScriptNormalizer>,
        logger: Box<dyn PipelineLogger>,
        options: TranslateOptions,
    ) -> Self {
        Self {
            reader,
            encoder,
            recognizer,
            translator,
            normalizer,
            logger,
            options,
        }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn execute(&mut self, upload: &UploadedAudio) -> Result<TranslationOutcome, PipelineError> {
        self.logger.stage(PipelineStage::Uploaded);
        self.logger.info(&format!(
            "Received {} ({:.1} MB)",
            upload.file_name(),
            upload.size_mb()
        ));

        self.logger.stage(PipelineStage::SizeCheck);
        let limit = self.options.max_upload_bytes;
        let oversized = upload.size_bytes() > limit;
        if oversized && self.options.oversize_policy == OversizePolicy::Reject {
            return Err(PipelineError::FileTooLarge {
                size_bytes: upload.size_bytes(),
                limit_bytes: limit,
            });
        }

        let (transcript, translation, mode, chunk_count) = if oversized {
            self.logger.stage(PipelineStage::ChunkedPass);
            let (transcript, translation, count) = self.chunked_pass(upload)?;
            (transcript, translation, ProcessingMode::Chunked, count)
        } else {
            self.logger.stage(PipelineStage::SinglePass);
            let (transcript, translation) = self.single_pass(upload)?;
            (transcript, translation, ProcessingMode::SinglePass, 1)
        };

        let started = Instant::now();
        let translation = self.normalizer.normalize(&translation);
        self.logger.timing("normalize", elapsed_ms(started));
        self.logger.stage(PipelineStage::Normalized);

        self.logger.stage(PipelineStage::Done);
        self.logger.summary();

        Ok(TranslationOutcome {
            transcript,
            translation,
            mode,
            chunk_count,
        })
    }

    fn single_pass(&mut self, upload: &UploadedAudio) -> Result<(String, String), PipelineError> {
        let transcript = self.transcribe(&upload.to_encoded())?;
        let translation = self.translate(&transcript)?;
        Ok((transcript, translation))
    }

    fn chunked_pass(
        &mut self,
        upload: &UploadedAudio,
    ) -> Result<(String, String, usize), PipelineError> {
        let workdir = tempfile::Builder::new()
            .prefix("lingoscribe-")
            .tempdir()
            .map_err(PipelineError::TempFile)?;
        let path = upload
            .persist(workdir.path())
            .map_err(PipelineError::TempFile)?;

        let started = Instant::now();
        let audio = self
            .reader
            .read_audio(&path, TRANSCRIPTION_SAMPLE_RATE)?
            .ok_or_else(|| PipelineError::NoAudio(upload.file_name().to_string()))?;
        self.logger.timing("decode", elapsed_ms(started));

        let chunks = self.options.audio_chunker.split(&audio);
        let total = chunks.len();
        self.logger.info(&format!(
            "Split {:.1}s of audio into {total} chunk(s)",
            audio.duration()
        ));

        let mut transcript = String::new();
        let mut translation = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            self.logger.progress(index + 1, total);

            let started = Instant::now();
            let encoded = self.encoder.encode(chunk, index)?;
            self.logger.timing("encode", elapsed_ms(started));

            let chunk_transcript = self.transcribe(&encoded)?;
            let chunk_translation = self.translate(&chunk_transcript)?;

            transcript.push_str(&chunk_transcript);
            transcript.push(' ');
            translation.push_str(&chunk_translation);
            translation.push(' ');
        }

        Ok((transcript, translation, total))
    }

    fn transcribe(&mut self, audio: &EncodedAudio) -> Result<String, PipelineError> {
        let started = Instant::now();
        let text = self.recognizer.transcribe(audio)?;
        self.logger.timing("transcribe", elapsed_ms(started));
        self.logger
            .metric("transcript_chars", text.chars().count() as f64);
        Ok(text)
    }

    fn translate(&mut self, text: &str) -> Result<String, PipelineError> {
        let started = Instant::now();
        let translated = translate_large_text(
            self.translator.as_ref(),
            &self.options.text_chunker,
            text,
            self.options.target,
        )?;
        self.logger.timing("translate", elapsed_ms(started));
        Ok(translated)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
