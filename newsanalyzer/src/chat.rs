// Stateless conversation turns: the caller owns the transcript and analytics
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::sync::{Arc, LazyLock};
use tracing::{error, info};

use crate::analysis::{AnalysisRecord, Analyzer};
use crate::error::AnalysisError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, Role};

pub const GREETING_SYSTEM: &str = "You are a news analysis assistant. You analyze news articles from a URL \
     (summary, authors, language, keywords, tone, style, fake-news check, readability and sentiment) \
     and answer follow-up questions about them.";
pub const GREETING_ASSISTANT: &str =
    "Hello! Send me the URL of a news article and I will analyze it for you.";
pub const SUMMARY_READY: &str =
    "Your article summary is ready. Ask me anything about it.";

const CHAT_TEMPERATURE: f32 = 0.0;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b(?:/[^\s?#]*)?(?:\?[^\s#]*)?",
    )
    .expect("Invalid regex: URL pattern")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Drop trailing sentence punctuation, and a closing parenthesis only when it
/// has no opening partner inside the match.
fn trim_trailing(mut url: &str) -> &str {
    loop {
        let trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(rest) if trimmed.matches(')').count() > trimmed.matches('(').count() => rest,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            return trimmed;
        }
        url = trimmed;
    }
}

/// First URL-looking substring of `text`, without trailing sentence punctuation.
pub fn find_url(text: &str) -> Option<&str> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| trim_trailing(m.as_str()))
        .find(|s| !s.is_empty())
}

/// Scheme-less matches are fetched over https.
pub fn normalize_url(matched: &str) -> String {
    let lower = matched.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        matched.to_string()
    } else {
        format!("https://{}", matched)
    }
}

/// Analytics carried across turns. Values received from the caller are kept
/// as raw JSON so they go back out exactly as they came in.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Analytics {
    Fresh(Box<AnalysisRecord>),
    Carried(Box<RawValue>),
}

impl<'de> Deserialize<'de> for Analytics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Box::<RawValue>::deserialize(deserializer).map(Analytics::Carried)
    }
}

impl Analytics {
    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            Analytics::Fresh(record) => Some(&**record),
            Analytics::Carried(_) => None,
        }
    }
}

/// Outcome of one chat turn
#[derive(Debug, Serialize)]
pub struct ChatTurn {
    pub history: Vec<ChatMessage>,
    pub analytics: Option<Analytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub struct ConversationDispatcher {
    analyzer: Arc<Analyzer>,
    chat_llm: Arc<dyn LlmProvider>,
    max_tokens: usize,
}

impl ConversationDispatcher {
    pub fn new(analyzer: Arc<Analyzer>, chat_llm: Arc<dyn LlmProvider>, max_tokens: usize) -> Self {
        Self {
            analyzer,
            chat_llm,
            max_tokens,
        }
    }

    /// Run one turn. Returns a fresh transcript, or an error and nothing else.
    pub async fn dispatch(
        &self,
        mut history: Vec<ChatMessage>,
        message: Option<String>,
        analytics: Option<Analytics>,
    ) -> Result<ChatTurn, AnalysisError> {
        if history.is_empty() {
            info!("starting new conversation");
            return Ok(ChatTurn {
                history: vec![
                    ChatMessage::system(GREETING_SYSTEM),
                    ChatMessage::assistant(GREETING_ASSISTANT),
                ],
                analytics,
                url: None,
            });
        }

        if let Some(message) = message {
            history.push(ChatMessage::user(message));
        }

        // Only a transcript ending on a user message can ask for a new analysis
        let matched = history
            .last()
            .filter(|m| m.role == Role::User)
            .and_then(|m| find_url(&m.content))
            .map(str::to_string);

        match matched {
            Some(url) => {
                let target = normalize_url(&url);
                info!(url = %target, "analyzing article from chat");
                let record = self.analyzer.analyze(&target).await?;
                history.push(ChatMessage::system(record.render()));
                history.push(ChatMessage::assistant(SUMMARY_READY));
                Ok(ChatTurn {
                    history,
                    analytics: Some(Analytics::Fresh(Box::new(record))),
                    url: Some(url),
                })
            }
            None => {
                let response = self
                    .chat_llm
                    .chat(ChatRequest {
                        messages: history.clone(),
                        max_tokens: Some(self.max_tokens),
                        temperature: Some(CHAT_TEMPERATURE),
                    })
                    .await
                    .map_err(|e| {
                        error!("chat completion failed: {:#}", e);
                        AnalysisError::language_service(e)
                    })?;
                history.push(ChatMessage::assistant(response.content.trim()));
                Ok(ChatTurn {
                    history,
                    analytics,
                    url: None,
                })
            }
        }
    }
}
