use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("failed to decode audio from {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("failed to encode audio chunk: {0}")]
    Encode(String),
}
