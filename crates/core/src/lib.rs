pub mod audio;
pub mod pipeline;
pub mod script;
pub mod shared;
pub mod transcription;
pub mod translation;
