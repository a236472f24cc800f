use super::target_language::TargetLanguage;
use super::text_chunker::TextChunker;
use super::translation_error::TranslationError;

/// Domain interface for machine translation of a single piece of text.
///
/// Implementations return the service's reply verbatim; nothing checks that
/// the reply contains only the target language.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslationError>;
}

/// Translate `text`, splitting it with `chunker` first when it exceeds the
/// chunk budget. Partial translations are joined with a single space in
/// chunk order.
pub fn translate_large_text(
    translator: &dyn Translator,
    chunker: &TextChunker,
    text: &str,
    target: TargetLanguage,
) -> Result<String, TranslationError> {
    if !chunker.needs_split(text) {
        return translator.translate(text, target);
    }

    let chunks = chunker.split(text);
    log::info!(
        "Translating {} characters in {} chunks",
        text.chars().count(),
        chunks.len()
    );

    let translated = chunks
        .iter()
        .map(|chunk| translator.translate(chunk, target))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(translated.join(" "))
}
