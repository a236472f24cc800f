pub mod pipeline_error;
pub mod pipeline_logger;
pub mod retry;
pub mod translate_audio_use_case;
