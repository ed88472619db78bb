// Article analysis pipeline: extraction, translation fallback, scoring, tone/style
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::error::AnalysisError;
use crate::extraction::ArticleExtractor;
use crate::llm::tone::infer_tone_and_style;
use crate::llm::translate::{is_english, translate_to_english};
use crate::llm::LlmProvider;
use crate::models::{ClassificationResult, FakeNewsLabel, ModelRegistry, SentimentLabel};

/// Result of analyzing one article; also the chat "analytics" value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub title: String,
    /// Extractive summary in the article's own language, never the translation
    pub summary: String,
    pub authors: Vec<String>,
    pub language: String,
    pub keywords: Vec<String>,
    pub tone: String,
    pub style: String,
    pub fake_news: ClassificationResult<FakeNewsLabel>,
    pub readability_score: f64,
    pub sentiment: SentimentLabel,
}

impl AnalysisRecord {
    /// Plain-text rendering embedded into chat transcripts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Article analysis");
        let _ = writeln!(out, "Title: {}", self.title);
        let _ = writeln!(out, "Authors: {}", list_or_unknown(&self.authors));
        let _ = writeln!(out, "Language: {}", self.language);
        let _ = writeln!(out, "Keywords: {}", list_or_unknown(&self.keywords));
        let _ = writeln!(out, "Tone: {}", self.tone);
        let _ = writeln!(out, "Style: {}", self.style);
        let _ = writeln!(out, "Fake news: {}", self.fake_news);
        let _ = writeln!(out, "Readability score: {:.2}", self.readability_score);
        let _ = writeln!(out, "Sentiment: {}", self.sentiment);
        let _ = write!(out, "Summary:\n{}", self.summary);
        out
    }
}

fn list_or_unknown(items: &[String]) -> String {
    if items.is_empty() {
        "unknown".to_string()
    } else {
        items.join(", ")
    }
}

/// Model outputs for one working summary
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub fake_news: ClassificationResult<FakeNewsLabel>,
    pub readability_score: f64,
    pub sentiment: SentimentLabel,
}

/// Run the three models over `text`. They only read immutable artifacts, so order does not matter.
pub fn score_text(models: &ModelRegistry, text: &str) -> Scores {
    Scores {
        fake_news: models.fake_news().classify(text),
        readability_score: models.readability().score(text),
        sentiment: models.sentiment().classify(text),
    }
}

/// Sequences extraction, translation, scoring and tone/style into one record.
pub struct Analyzer {
    extractor: Arc<dyn ArticleExtractor>,
    language_llm: Arc<dyn LlmProvider>,
    models: Arc<ModelRegistry>,
}

impl Analyzer {
    pub fn new(
        extractor: Arc<dyn ArticleExtractor>,
        language_llm: Arc<dyn LlmProvider>,
        models: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            extractor,
            language_llm,
            models,
        }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Analyze the article at `url`. Any failing step aborts the whole call.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisRecord, AnalysisError> {
        let start = Instant::now();

        let article = self.extractor.extract(url).await.map_err(|e| {
            error!(url, "extraction failed: {:#}", e);
            AnalysisError::extraction(e)
        })?;

        let summary_original = article.summary.clone();

        let working_summary = if is_english(&article.language) {
            summary_original.clone()
        } else {
            info!(url, language = %article.language, "translating summary for scoring");
            translate_to_english(self.language_llm.as_ref(), &summary_original, &article.language)
                .await
                .map_err(|e| {
                    error!(url, "translation failed: {:#}", e);
                    AnalysisError::translation(e)
                })?
        };

        let scores = score_text(&self.models, &working_summary);

        let tone_style = infer_tone_and_style(self.language_llm.as_ref(), &summary_original, &article.language)
            .await
            .map_err(|e| {
                error!(url, "tone/style inference failed: {:#}", e);
                AnalysisError::language_service(e)
            })?;

        info!(
            url,
            language = %article.language,
            fake_news = %scores.fake_news,
            sentiment = %scores.sentiment,
            readability = scores.readability_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisRecord {
            title: article.title,
            summary: summary_original,
            authors: article.authors,
            language: article.language,
            keywords: article.keywords,
            tone: tone_style.tone,
            style: tone_style.style,
            fake_news: scores.fake_news,
            readability_score: scores.readability_score,
            sentiment: scores.sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            title: "Council adopts budget".to_string(),
            summary: "The council adopted the budget.".to_string(),
            authors: vec![],
            language: "en".to_string(),
            keywords: vec!["council".to_string(), "budget".to_string()],
            tone: "Neutral".to_string(),
            style: "Informative".to_string(),
            fake_news: ClassificationResult::Single(FakeNewsLabel::Real),
            readability_score: 7.256,
            sentiment: SentimentLabel::Positive,
        }
    }

    #[test]
    fn test_render() {
        let text = record().render();
        assert!(text.contains("Title: Council adopts budget"));
        assert!(text.contains("Authors: unknown"));
        assert!(text.contains("Keywords: council, budget"));
        assert!(text.contains("Fake news: Real"));
        assert!(text.contains("Readability score: 7.26"));
        assert!(text.ends_with("Summary:\nThe council adopted the budget."));
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["fake_news"], "Real");
        assert_eq!(json["sentiment"], "Positive");
        assert_eq!(json["readability_score"], 7.256);
        let back: AnalysisRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record());
    }
}
