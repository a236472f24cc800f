use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use lingoscribe_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use lingoscribe_core::audio::infrastructure::wav_encoder::WavEncoder;
use lingoscribe_core::pipeline::pipeline_error::PipelineError;
use lingoscribe_core::pipeline::pipeline_logger::LogPipelineLogger;
use lingoscribe_core::pipeline::retry::{policy_for, RetryingRecognizer, RetryingTranslator};
use lingoscribe_core::pipeline::translate_audio_use_case::{
    TranslateAudioUseCase, TranslateOptions, TranslationOutcome,
};
use lingoscribe_core::script::domain::script_normalizer::{IdentityNormalizer, ScriptNormalizer};
use lingoscribe_core::script::infrastructure::zhconv_normalizer::ZhconvNormalizer;
use lingoscribe_core::shared::api_endpoint::build_http_client;
use lingoscribe_core::shared::config::{AppConfig, OversizePolicy, Settings, API_KEY_ENV};
use lingoscribe_core::shared::constants::DEFAULT_COLUMN_WIDTH;
use lingoscribe_core::shared::text_panels::{render_columns, render_stacked, Panel};
use lingoscribe_core::shared::uploaded_audio::UploadedAudio;
use lingoscribe_core::transcription::domain::speech_recognizer::SpeechRecognizer;
use lingoscribe_core::transcription::infrastructure::openai_recognizer::OpenAiRecognizer;
use lingoscribe_core::translation::domain::target_language::TargetLanguage;
use lingoscribe_core::translation::domain::translator::Translator;
use lingoscribe_core::translation::infrastructure::openai_translator::OpenAiTranslator;

const TRANSCRIPT_TITLE: &str = "Transcribed Text:";
const TRANSLATION_TITLE: &str = "Translated Text:";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    Columns,
    Stacked,
}

/// Transcribe an MP3 recording and translate the transcript.
#[derive(Parser)]
#[command(name = "lingoscribe")]
struct Cli {
    /// Input MP3 file.
    #[arg(required_unless_present = "list_languages")]
    input: Option<PathBuf>,

    /// Target language key (see --list-languages).
    #[arg(long)]
    language: Option<TargetLanguage>,

    /// What to do with uploads over the size limit: chunk or reject.
    #[arg(long)]
    oversize: Option<OversizePolicy>,

    /// API key for the speech and chat services.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Speech-to-text model name.
    #[arg(long)]
    transcription_model: Option<String>,

    /// Chat model used for translation.
    #[arg(long)]
    translation_model: Option<String>,

    /// Sampling temperature for translation (0.0-2.0).
    #[arg(long)]
    temperature: Option<f32>,

    /// Audio chunk length in minutes for oversized uploads.
    #[arg(long)]
    chunk_minutes: Option<u64>,

    /// Character budget per translation request.
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Total attempts per remote call (1 = no retry).
    #[arg(long)]
    retries: Option<u32>,

    /// Pause between attempts in milliseconds.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total output width in terminal columns.
    #[arg(long, default_value_t = DEFAULT_COLUMN_WIDTH)]
    width: usize,

    /// Show the panels side by side or one after the other.
    #[arg(long, value_enum, default_value = "columns")]
    layout: Layout,

    /// Print the supported target languages and exit.
    #[arg(long)]
    list_languages: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list_languages {
        for language in TargetLanguage::ALL {
            println!("{:8} {}", language.key(), language.label());
        }
        return Ok(());
    }

    validate(&cli)?;
    let (config, upload) = prepare(&cli)?;

    let mut use_case = build_use_case(&config)?;
    let outcome = use_case.execute(&upload).map_err(describe_failure)?;
    log::info!(
        "Finished {} in {} mode ({} chunk(s))",
        upload.file_name(),
        outcome.mode,
        outcome.chunk_count
    );

    print!("{}", render(&outcome, cli.layout, cli.width));
    Ok(())
}

/// Configuration problems, such as a missing API key, surface before the
/// upload is read into memory.
fn prepare(cli: &Cli) -> Result<(AppConfig, UploadedAudio), Box<dyn std::error::Error>> {
    let settings = apply_overrides(load_settings(cli)?, cli);
    let config = AppConfig::new(cli.api_key.clone(), settings)?;
    log::debug!("Configuration: {config:?}");

    let input = cli.input.as_ref().ok_or("Please upload an audio file")?;
    let upload = UploadedAudio::from_path(input)?;
    Ok((config, upload))
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(language) = cli.language {
        settings.target_language = language;
    }
    if let Some(policy) = cli.oversize {
        settings.oversize_policy = policy;
    }
    if let Some(url) = &cli.api_base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(model) = &cli.transcription_model {
        settings.transcription_model = model.clone();
    }
    if let Some(model) = &cli.translation_model {
        settings.translation_model = model.clone();
    }
    if let Some(temperature) = cli.temperature {
        settings.temperature = temperature;
    }
    if let Some(minutes) = cli.chunk_minutes {
        settings.chunk_duration_ms = minutes.saturating_mul(60_000);
    }
    if let Some(chars) = cli.max_chunk_chars {
        settings.max_chunk_chars = chars;
    }
    if let Some(retries) = cli.retries {
        settings.retry_attempts = retries;
    }
    if let Some(delay) = cli.retry_delay_ms {
        settings.retry_delay_ms = delay;
    }
    settings
}

fn build_use_case(config: &AppConfig) -> Result<TranslateAudioUseCase, Box<dyn std::error::Error>> {
    let settings = config.settings();
    let http = build_http_client(config.request_timeout())?;

    let mut recognizer: Box<dyn SpeechRecognizer> = Box::new(OpenAiRecognizer::new(
        http.clone(),
        config.endpoint(),
        settings.transcription_model.clone(),
    ));
    let mut translator: Box<dyn Translator> = Box::new(OpenAiTranslator::new(
        http,
        config.endpoint(),
        settings.translation_model.clone(),
        settings.temperature,
    ));
    if settings.retry_attempts > 1 {
        log::info!(
            "Retrying failed requests up to {} times",
            settings.retry_attempts
        );
        recognizer = Box::new(RetryingRecognizer::new(
            recognizer,
            policy_for(settings.retry_attempts, config.retry_delay()),
        ));
        translator = Box::new(RetryingTranslator::new(
            translator,
            policy_for(settings.retry_attempts, config.retry_delay()),
        ));
    }

    let normalizer: Box<dyn ScriptNormalizer> =
        if settings.target_language.requires_script_normalization() {
            Box::new(ZhconvNormalizer::taiwan())
        } else {
            Box::new(IdentityNormalizer)
        };

    Ok(TranslateAudioUseCase::new(
        Box::new(FfmpegAudioReader),
        Box::new(WavEncoder),
        recognizer,
        translator,
        normalizer,
        Box::new(LogPipelineLogger::new()),
        TranslateOptions::from_config(config),
    ))
}

/// Input problems are shown as-is; anything else is reported as a failed run
/// with the cause attached.
fn describe_failure(e: PipelineError) -> Box<dyn std::error::Error> {
    if e.is_input_error() {
        e.into()
    } else {
        format!("Transcription and translation failed: {e}").into()
    }
}

fn render(outcome: &TranslationOutcome, layout: Layout, width: usize) -> String {
    let transcript = Panel {
        title: TRANSCRIPT_TITLE,
        body: &outcome.transcript,
    };
    let translation = Panel {
        title: TRANSLATION_TITLE,
        body: &outcome.translation,
    };
    match layout {
        Layout::Columns => render_columns(&transcript, &translation, width),
        Layout::Stacked => render_stacked(&[transcript, translation]),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Please upload an audio file: {} not found", input.display()).into());
        }
    }
    if let Some(t) = cli.temperature {
        if !(0.0..=2.0).contains(&t) {
            return Err(format!("Temperature must be between 0.0 and 2.0, got {t}").into());
        }
    }
    if cli.chunk_minutes == Some(0) {
        return Err("Chunk minutes must be at least 1".into());
    }
    if cli.max_chunk_chars == Some(0) {
        return Err("Max chunk chars must be at least 1".into());
    }
    if cli.retries == Some(0) {
        return Err("Retries must be at least 1".into());
    }
    if cli.width < 20 {
        return Err(format!("Width must be at least 20 columns, got {}", cli.width).into());
    }
    Ok(())
}
