use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod nlp;
pub mod stopwords;
pub mod web;

/// Article as extracted from a web page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    /// Main body text
    pub text: String,
    /// Primary language subtag, lowercased (e.g. "en", "fr")
    pub language: String,
    pub authors: Vec<String>,
    /// Ranked, de-duplicated keywords
    pub keywords: Vec<String>,
    /// Extractive summary in the article's own language
    pub summary: String,
}

/// Fetches and parses an article page.
#[async_trait::async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<RawArticle>;
}
