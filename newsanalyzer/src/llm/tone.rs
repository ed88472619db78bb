// Tone and style inference over the original-language text
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{language_name, LlmProvider, LlmRequest};

/// Room for two words in scripts that tokenize into many pieces (Devanagari, Tamil);
/// the prompt holds the answer to two words.
const TONE_STYLE_MAX_TOKENS: usize = 32;
const TONE_STYLE_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneStyle {
    pub tone: String,
    pub style: String,
}

fn prompt(question: &str, text: &str, language: &str) -> String {
    format!(
        "{}\n\
         Answer in {} with at most two words. Reply with the words only, no punctuation or explanation.\n\n\
         ARTICLE:\n{}",
        question,
        language_name(language),
        text
    )
}

/// Two independent calls: emotional tone, then rhetorical style.
pub async fn infer_tone_and_style<P: LlmProvider + ?Sized>(
    provider: &P,
    text: &str,
    language: &str,
) -> Result<ToneStyle> {
    let request = |question: &str| LlmRequest {
        prompt: prompt(question, text, language),
        max_tokens: Some(TONE_STYLE_MAX_TOKENS),
        temperature: Some(TONE_STYLE_TEMPERATURE),
        timeout_seconds: None,
    };

    let (tone, style) = tokio::try_join!(
        async {
            provider
                .generate(request("What is the emotional tone of this news article?"))
                .await
                .context("tone inference failed")
        },
        async {
            provider
                .generate(request("What is the rhetorical writing style of this news article?"))
                .await
                .context("style inference failed")
        },
    )?;

    Ok(ToneStyle {
        tone: tone.content.trim().to_string(),
        style: style.content.trim().to_string(),
    })
}
