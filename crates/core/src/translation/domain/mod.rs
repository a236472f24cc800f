pub mod prompt;
pub mod target_language;
pub mod text_chunker;
pub mod translation_error;
pub mod translator;
