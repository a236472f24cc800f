pub mod audio_chunker;
pub mod audio_encoder;
pub mod audio_error;
pub mod audio_reader;
pub mod audio_segment;
