// Shared fakes for integration tests
#![allow(dead_code)]

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use newsanalyzer::analysis::Analyzer;
use newsanalyzer::extraction::{ArticleExtractor, RawArticle};
use newsanalyzer::llm::{ChatRequest, LlmProvider, LlmRequest, LlmResponse, UsageMetadata};
use newsanalyzer::models::linear::{LinearClassifier, LinearRegressor};
use newsanalyzer::models::vectorizer::TfIdfVectorizer;
use newsanalyzer::models::{
    FakeNewsClassifier, FakeNewsLabel, ModelRegistry, ReadabilityScorer, SentimentClassifier,
    SentimentLabel,
};

const VOCABULARY: [&str; 9] = [
    "fake", "hoax", "shocking", "council", "budget", "good", "great", "bad", "terrible",
];

fn vectorizer() -> TfIdfVectorizer {
    let vocabulary: HashMap<String, usize> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    TfIdfVectorizer::new(vocabulary, vec![1.0; VOCABULARY.len()]).unwrap()
}

fn fake_news_weights(sign: f64) -> LinearClassifier<FakeNewsLabel> {
    let coef = vec![-2.0, -2.0, -1.0, 1.5, 1.5, 0.0, 0.0, 0.0, 0.0]
        .into_iter()
        .map(|w| w * sign)
        .collect();
    LinearClassifier::new(&["Fake", "Real"], vec![coef], vec![0.0]).unwrap()
}

fn sentiment() -> SentimentClassifier {
    let model = LinearClassifier::<SentimentLabel>::new(
        &["Negative", "Positive"],
        vec![vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0, -2.0, -2.0]],
        vec![0.0],
    )
    .unwrap();
    SentimentClassifier::new(vectorizer(), model).unwrap()
}

fn readability() -> ReadabilityScorer {
    // Score equals the Flesch-Kincaid grade
    let mut coef = vec![0.0; 4 + VOCABULARY.len()];
    coef[0] = 1.0;
    ReadabilityScorer::new(vectorizer(), LinearRegressor::new(coef, 0.0)).unwrap()
}

/// Small hand-weighted models over a nine-term vocabulary.
pub fn models() -> ModelRegistry {
    let fake_news = FakeNewsClassifier::single(vectorizer(), fake_news_weights(1.0)).unwrap();
    ModelRegistry::new(fake_news, readability(), sentiment())
}

/// Same as `models` but with a two-member fake-news ensemble that disagrees.
pub fn ensemble_models() -> ModelRegistry {
    let fake_news = FakeNewsClassifier::ensemble(
        vectorizer(),
        vec![
            ("logistic_regression".to_string(), fake_news_weights(1.0)),
            ("contrarian".to_string(), fake_news_weights(-1.0)),
        ],
    )
    .unwrap();
    ModelRegistry::new(fake_news, readability(), sentiment())
}

pub fn english_article() -> RawArticle {
    RawArticle {
        title: "Council approves budget".to_string(),
        text: "The city council approved the budget on Monday. It is a good budget.".to_string(),
        language: "en".to_string(),
        authors: vec!["Jane Doe".to_string()],
        keywords: vec!["council".to_string(), "budget".to_string()],
        summary: "The city council approved the budget on Monday. It is a good budget.".to_string(),
    }
}

pub fn french_article() -> RawArticle {
    RawArticle {
        title: "Le conseil adopte le budget".to_string(),
        text: "Le conseil municipal a adopté le budget lundi.".to_string(),
        language: "fr".to_string(),
        authors: vec![],
        keywords: vec!["conseil".to_string(), "budget".to_string()],
        summary: "Le conseil municipal a adopté le budget lundi.".to_string(),
    }
}

/// Extractor returning a fixed article (or failing) and recording requested URLs.
pub struct FakeExtractor {
    article: Option<RawArticle>,
    pub urls: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn returning(article: RawArticle) -> Self {
        Self {
            article: Some(article),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            article: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArticleExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<RawArticle> {
        self.urls.lock().unwrap().push(url.to_string());
        match &self.article {
            Some(article) => Ok(article.clone()),
            None => anyhow::bail!("article page returned 404 Not Found"),
        }
    }
}

/// Answers translation, tone and style prompts by keyword; chat replies are fixed.
pub struct ScriptedLlm {
    pub translation: String,
    pub tone: String,
    pub style: String,
    pub chat_reply: String,
    pub fail_translation: bool,
    pub fail_tone: bool,
    pub fail_chat: bool,
    pub prompts: Mutex<Vec<String>>,
    pub chats: Mutex<Vec<ChatRequest>>,
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self {
            translation: "The city council adopted a great budget on Monday.".to_string(),
            tone: "Neutral".to_string(),
            style: "Informative".to_string(),
            chat_reply: "I can analyze news articles for you.".to_string(),
            fail_translation: false,
            fail_tone: false,
            fail_chat: false,
            prompts: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedLlm {
    pub fn translation_prompts(&self) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.starts_with("Translate"))
            .count()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

fn reply(content: &str) -> LlmResponse {
    LlmResponse {
        content: content.to_string(),
        usage: UsageMetadata::default(),
        model: "scripted".to_string(),
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if request.prompt.starts_with("Translate") {
            if self.fail_translation {
                anyhow::bail!("LLM API error 503 Service Unavailable: overloaded");
            }
            return Ok(reply(&self.translation));
        }
        if request.prompt.contains("emotional tone") {
            if self.fail_tone {
                anyhow::bail!("LLM request timed out");
            }
            return Ok(reply(&format!("  {}\n", self.tone)));
        }
        if request.prompt.contains("writing style") {
            return Ok(reply(&self.style));
        }
        anyhow::bail!("unexpected prompt: {}", request.prompt)
    }

    async fn chat(&self, request: ChatRequest) -> Result<LlmResponse> {
        self.chats.lock().unwrap().push(request);
        if self.fail_chat {
            anyhow::bail!("LLM API error 500 Internal Server Error: boom");
        }
        Ok(reply(&self.chat_reply))
    }
}

pub fn analyzer(extractor: Arc<FakeExtractor>, llm: Arc<ScriptedLlm>) -> Analyzer {
    Analyzer::new(extractor, llm, Arc::new(models()))
}
