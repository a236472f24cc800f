pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const TRANSCRIPTION_PATH: &str = "audio/transcriptions";
pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gpt-3.5-turbo-16k";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Uploads above this size are "oversized" and handled per `OversizePolicy`.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
/// Largest audio body the transcription endpoint accepts.
pub const MAX_REMOTE_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Sample rate chunks are decoded to before re-encoding (Whisper's native rate).
pub const TRANSCRIPTION_SAMPLE_RATE: u32 = 16000;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];
pub const MP3_MIME_TYPE: &str = "audio/mpeg";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_COLUMN_WIDTH: usize = 120;
