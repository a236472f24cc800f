use serde::Deserialize;
use serde_json::json;

use crate::shared::api_endpoint::ApiEndpoint;
use crate::shared::constants::CHAT_COMPLETIONS_PATH;
use crate::translation::domain::prompt::build_prompt;
use crate::translation::domain::target_language::TargetLanguage;
use crate::translation::domain::translation_error::TranslationError;
use crate::translation::domain::translator::Translator;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Translator backed by an OpenAI chat-completion model.
///
/// Each call sends one user message built from the fixed translation prompt
/// and returns the first choice's content unchanged.
pub struct OpenAiTranslator {
    http: reqwest::blocking::Client,
    endpoint: ApiEndpoint,
    model: String,
    temperature: f32,
}

impl OpenAiTranslator {
    pub fn new(
        http: reqwest::blocking::Client,
        endpoint: ApiEndpoint,
        model: String,
        temperature: f32,
    ) -> Self {
        Self {
            http,
            endpoint,
            model,
            temperature,
        }
    }

    fn payload(&self, text: &str, target: TargetLanguage) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": build_prompt(text, target) }
            ],
            "temperature": self.temperature,
        })
    }
}

impl Translator for OpenAiTranslator {
    fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslationError> {
        log::debug!(
            "Translating {} characters to {target} with model {}",
            text.chars().count(),
            self.model
        );

        let request = self.http.post(self.endpoint.url(CHAT_COMPLETIONS_PATH));
        let response = self
            .endpoint
            .authorize(request)
            .json(&self.payload(text, target))
            .send()
            .map_err(|e| {
                log::error!("Translation request error: {e}");
                TranslationError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Translation API error response ({status}): {body}");
            return Err(TranslationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| TranslationError::Decode(e.to_string()))?;
        let content = parse_completion(&body)?;
        log::info!(
            "Translation successful: {} characters",
            content.chars().count()
        );
        Ok(content)
    }
}

fn parse_completion(body: &str) -> Result<String, TranslationError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| TranslationError::Decode(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(TranslationError::EmptyChoices)?;
    Ok(choice.message.content.unwrap_or_default())
}
