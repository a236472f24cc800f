use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::domain::audio_encoder::EncodedAudio;

use super::constants::{AUDIO_EXTENSIONS, MP3_MIME_TYPE};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please upload an audio file: {0} does not exist")]
    NotFound(PathBuf),
    #[error("Unsupported file type '{file_name}': only {} files are accepted", AUDIO_EXTENSIONS.join(", "))]
    UnsupportedFormat { file_name: String },
    #[error("Uploaded file '{0}' is empty")]
    Empty(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw bytes of an uploaded audio file plus its declared name.
#[derive(Clone)]
pub struct UploadedAudio {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadedAudio {
    /// Directory parts of `file_name` are dropped, so `persist` always writes
    /// directly into the directory it is given.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = base_name(&file_name.into());
        if !has_supported_extension(&file_name) {
            return Err(UploadError::UnsupportedFormat { file_name });
        }
        if bytes.is_empty() {
            return Err(UploadError::Empty(file_name));
        }
        Ok(Self { file_name, bytes })
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        if !path.exists() {
            return Err(UploadError::NotFound(path.to_path_buf()));
        }
        let file_name = base_name(&path.to_string_lossy());
        // Reject by extension before reading a possibly large file
        if !has_supported_extension(&file_name) {
            return Err(UploadError::UnsupportedFormat { file_name });
        }
        let bytes = fs::read(path).map_err(|e| UploadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes() as f64 / (1024.0 * 1024.0)
    }

    /// The upload as-is, ready to send to the transcription service.
    pub fn to_encoded(&self) -> EncodedAudio {
        EncodedAudio::new(self.bytes.clone(), self.file_name.clone(), MP3_MIME_TYPE)
    }

    /// Write the upload into `dir` and return the written path.
    pub fn persist(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl std::fmt::Debug for UploadedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedAudio")
            .field("file_name", &self.file_name)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

fn base_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_supported_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::lower("talk.mp3", true)]
    #[case::upper("TALK.MP3", true)]
    #[case::wav("talk.wav", false)]
    #[case::no_extension("talk", false)]
    #[case::mp3_in_stem("talk.mp3.txt", false)]
    fn test_supported_extension(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_supported_extension(name), expected);
    }

    #[test]
    fn test_new_rejects_empty_bytes() {
        let result = UploadedAudio::new("talk.mp3", vec![]);
        assert!(matches!(result, Err(UploadError::Empty(_))));
    }

    #[test]
    fn test_new_rejects_wrong_format() {
        let result = UploadedAudio::new("talk.ogg", vec![1]);
        assert!(matches!(result, Err(UploadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_size_mb() {
        let upload = UploadedAudio::new("talk.mp3", vec![0; 3 * 1024 * 1024]).unwrap();
        assert_eq!(upload.size_bytes(), 3 * 1024 * 1024);
        assert_relative_eq!(upload.size_mb(), 3.0);
    }

    #[test]
    fn test_from_path_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = UploadedAudio::from_path(&tmp.path().join("missing.mp3"));
        assert!(matches!(result, Err(UploadError::NotFound(_))));
    }

    #[test]
    fn test_from_path_reads_bytes_and_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lecture.mp3");
        fs::write(&path, b"ID3fake").unwrap();

        let upload = UploadedAudio::from_path(&path).unwrap();
        assert_eq!(upload.file_name(), "lecture.mp3");
        assert_eq!(upload.bytes(), b"ID3fake");
    }

    #[test]
    fn test_persist_and_to_encoded() {
        let tmp = TempDir::new().unwrap();
        let upload = UploadedAudio::new("a.mp3", vec![7, 8, 9]).unwrap();

        let path = upload.persist(tmp.path()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![7, 8, 9]);

        let encoded = upload.to_encoded();
        assert_eq!(encoded.file_name, "a.mp3");
        assert_eq!(encoded.mime_type, "audio/mpeg");
        assert_eq!(encoded.bytes, vec![7, 8, 9]);
    }

    #[rstest]
    #[case::parent_dir("../x.mp3")]
    #[case::nested("uploads/2024/x.mp3")]
    #[case::absolute("/tmp/elsewhere/x.mp3")]
    fn test_directory_parts_are_dropped(#[case] name: &str) {
        let tmp = TempDir::new().unwrap();
        let upload = UploadedAudio::new(name, vec![1]).unwrap();
        assert_eq!(upload.file_name(), "x.mp3");

        let path = upload.persist(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("x.mp3"));
        assert!(path.exists());
    }

    #[test]
    fn test_name_without_file_component_is_rejected() {
        let result = UploadedAudio::new("..", vec![1]);
        assert!(matches!(result, Err(UploadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_debug_omits_bytes() {
        let upload = UploadedAudio::new("a.mp3", vec![1, 2, 3]).unwrap();
        let debug = format!("{upload:?}");
        assert!(debug.contains("size_bytes: 3"));
    }
}
