use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::domain::audio_chunker::{AudioChunker, DEFAULT_CHUNK_DURATION_MS};
use crate::translation::domain::target_language::TargetLanguage;
use crate::translation::domain::text_chunker::{TextChunker, DEFAULT_MAX_CHUNK_CHARS};

use super::api_endpoint::ApiEndpoint;
use super::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
    DEFAULT_TRANSCRIPTION_MODEL, DEFAULT_TRANSLATION_MODEL, MAX_REMOTE_AUDIO_BYTES,
    MAX_UPLOAD_BYTES, TRANSCRIPTION_SAMPLE_RATE,
};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key is not configured: set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What to do with an upload larger than the size threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Decode the audio and process it in fixed-duration chunks.
    #[default]
    Chunk,
    /// Refuse the upload before any remote call is made.
    Reject,
}

impl OversizePolicy {
    pub const ALL: &[OversizePolicy] = &[OversizePolicy::Chunk, OversizePolicy::Reject];
}

impl fmt::Display for OversizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OversizePolicy::Chunk => write!(f, "chunk"),
            OversizePolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for OversizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chunk" => Ok(OversizePolicy::Chunk),
            "reject" => Ok(OversizePolicy::Reject),
            other => Err(format!(
                "oversize policy must be 'chunk' or 'reject', got '{other}'"
            )),
        }
    }
}

/// Tunable defaults, optionally persisted as JSON in the user config directory.
///
/// Missing fields in the file fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub transcription_model: String,
    pub translation_model: String,
    pub temperature: f32,
    pub max_upload_bytes: u64,
    pub chunk_duration_ms: u64,
    pub max_chunk_chars: usize,
    pub oversize_policy: OversizePolicy,
    pub target_language: TargetLanguage,
    /// Total attempts per remote call; 1 disables retry.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            chunk_duration_ms: DEFAULT_CHUNK_DURATION_MS,
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            oversize_policy: OversizePolicy::default(),
            target_language: TargetLanguage::default(),
            retry_attempts: 1,
            retry_delay_ms: 1000,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// `<config dir>/Lingoscribe/settings.json`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Lingoscribe").join("settings.json"))
    }

    /// Load the settings file from the default location, or defaults if none exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if self.transcription_model.trim().is_empty() {
            return Err(invalid("transcription_model", "must not be empty"));
        }
        if self.translation_model.trim().is_empty() {
            return Err(invalid("translation_model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(
                "temperature",
                format!("must be between 0.0 and 2.0, got {}", self.temperature),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(invalid("max_upload_bytes", "must be > 0"));
        }
        // Uploads up to this size go to the service unchanged.
        if self.max_upload_bytes > MAX_REMOTE_AUDIO_BYTES as u64 {
            return Err(invalid(
                "max_upload_bytes",
                format!(
                    "must not exceed the service limit of {MAX_REMOTE_AUDIO_BYTES} bytes, got {}",
                    self.max_upload_bytes
                ),
            ));
        }
        if self.chunk_duration_ms == 0 {
            return Err(invalid("chunk_duration_ms", "must be > 0"));
        }
        let chunk_bytes = wav_chunk_bytes(self.chunk_duration_ms);
        if chunk_bytes > MAX_REMOTE_AUDIO_BYTES as u64 {
            return Err(invalid(
                "chunk_duration_ms",
                format!(
                    "a {}ms chunk encodes to {chunk_bytes} bytes, over the service limit of {MAX_REMOTE_AUDIO_BYTES} bytes",
                    self.chunk_duration_ms
                ),
            ));
        }
        if self.max_chunk_chars == 0 {
            return Err(invalid("max_chunk_chars", "must be > 0"));
        }
        if self.retry_attempts == 0 {
            return Err(invalid("retry_attempts", "must be >= 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be > 0"));
        }
        Ok(())
    }
}

const WAV_HEADER_BYTES: u64 = 44;
const WAV_BYTES_PER_FRAME: u64 = 2;

/// Size of a chunk of `duration_ms` once encoded as 16-bit mono WAV at the
/// transcription sample rate.
pub fn wav_chunk_bytes(duration_ms: u64) -> u64 {
    let frames = duration_ms.saturating_mul(TRANSCRIPTION_SAMPLE_RATE as u64) / 1000;
    frames
        .saturating_mul(WAV_BYTES_PER_FRAME)
        .saturating_add(WAV_HEADER_BYTES)
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Validated runtime configuration, built once at startup and handed to the
/// pipeline.
#[derive(Clone)]
pub struct AppConfig {
    api_key: String,
    settings: Settings,
}

impl AppConfig {
    pub fn new(api_key: Option<String>, settings: Settings) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        settings.validate()?;
        Ok(Self { api_key, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn endpoint(&self) -> ApiEndpoint {
        ApiEndpoint::new(self.settings.api_base_url.clone(), self.api_key.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.settings.retry_delay_ms)
    }

    pub fn text_chunker(&self) -> TextChunker {
        // validate() guarantees a non-zero budget
        TextChunker::new(self.settings.max_chunk_chars).unwrap_or_default()
    }

    pub fn audio_chunker(&self) -> AudioChunker {
        AudioChunker::new(self.settings.chunk_duration_ms).unwrap_or_default()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[REDACTED]")
            .field("settings", &self.settings)
            .finish()
    }
}
