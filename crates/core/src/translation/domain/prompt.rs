use super::target_language::TargetLanguage;

/// Build the single user message sent to the chat model: the quoted source
/// text followed by the translate-only instruction.
pub fn build_prompt(text: &str, target: TargetLanguage) -> String {
    format!(
        "'{text}'\nTranslate the text above into {}. Output only the translated text, without the original.",
        target.prompt_name()
    )
}
