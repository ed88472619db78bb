// Translation fallback for non-English articles
use anyhow::Result;
use tracing::info;

use super::{language_name, LlmProvider, LlmRequest};

const TRANSLATION_TEMPERATURE: f32 = 0.2;

pub fn is_english(language: &str) -> bool {
    language.eq_ignore_ascii_case("en")
}

/// Ask the language model to rewrite `text` in English. One call, no retry.
pub async fn translate_to_english<P: LlmProvider + ?Sized>(
    provider: &P,
    text: &str,
    source_language: &str,
) -> Result<String> {
    let prompt = format!(
        "Translate the following {} text into English.\n\
         Preserve the meaning and the formatting (line breaks, lists, punctuation) exactly.\n\
         Return only the translated text, without any preamble or comment.\n\n\
         TEXT:\n{}",
        language_name(source_language),
        text
    );

    let response = provider
        .generate(LlmRequest {
            prompt,
            max_tokens: None,
            temperature: Some(TRANSLATION_TEMPERATURE),
            timeout_seconds: None,
        })
        .await?;

    let translated = response.content.trim();
    if translated.is_empty() {
        anyhow::bail!("language model returned an empty translation");
    }
    info!(
        source_language,
        chars = translated.len(),
        tokens = response.usage.total_tokens,
        "translation complete"
    );
    Ok(translated.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, LlmResponse, UsageMetadata};
    use std::sync::Mutex;

    struct EchoLlm {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
            self.prompts.lock().unwrap().push(request.prompt);
            Ok(LlmResponse {
                content: self.reply.clone(),
                usage: UsageMetadata::default(),
                model: "echo".to_string(),
            })
        }

        async fn chat(&self, _request: ChatRequest) -> Result<LlmResponse> {
            anyhow::bail!("not used")
        }
    }

    #[tokio::test]
    async fn test_translation_is_trimmed_and_prompt_names_language() {
        let llm = EchoLlm {
            reply: "\n  The council adopted the budget.  \n".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        let out = translate_to_english(&llm, "Le conseil a adopté le budget.", "fr")
            .await
            .unwrap();
        assert_eq!(out, "The council adopted the budget.");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("French"));
        assert!(prompts[0].contains("Le conseil a adopté le budget."));
    }

    #[tokio::test]
    async fn test_empty_translation_is_an_error() {
        let llm = EchoLlm {
            reply: "   ".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        assert!(translate_to_english(&llm, "Hola", "es").await.is_err());
    }

    #[test]
    fn test_is_english() {
        assert!(is_english("en"));
        assert!(is_english("EN"));
        assert!(!is_english("fr"));
        assert!(!is_english("en-US"));
    }
}
