use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use common::{ClassifierMode, ModelsConfig};

pub mod classifiers;
pub mod features;
pub mod linear;
pub mod readability;
pub mod vectorizer;

pub use classifiers::{FakeNewsClassifier, SentimentClassifier};
pub use readability::ReadabilityScorer;

/// Fake-news label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FakeNewsLabel {
    Fake,
    Real,
}

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl FromStr for FakeNewsLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fake" => Ok(Self::Fake),
            "real" => Ok(Self::Real),
            other => Err(format!("expected Fake or Real, got '{}'", other)),
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(format!("expected Positive or Negative, got '{}'", other)),
        }
    }
}

impl fmt::Display for FakeNewsLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fake => "Fake",
            Self::Real => "Real",
        })
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        })
    }
}

/// A single label, or one label per classifier in ensemble mode.
///
/// Serialized untagged: `"Fake"` or `{"logistic_regression": "Fake", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResult<L> {
    Single(L),
    Ensemble(BTreeMap<String, L>),
}

impl<L: fmt::Display> fmt::Display for ClassificationResult<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(label) => write!(f, "{}", label),
            Self::Ensemble(labels) => {
                let parts: Vec<String> = labels
                    .iter()
                    .map(|(name, label)| format!("{}: {}", name, label))
                    .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// All pre-trained artifacts, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    fake_news: FakeNewsClassifier,
    readability: ReadabilityScorer,
    sentiment: SentimentClassifier,
}

impl ModelRegistry {
    pub fn new(
        fake_news: FakeNewsClassifier,
        readability: ReadabilityScorer,
        sentiment: SentimentClassifier,
    ) -> Self {
        Self {
            fake_news,
            readability,
            sentiment,
        }
    }

    /// Load the artifact layout rooted at `root`:
    /// `fake_news/`, `readability/` and `sentiment/`, each with its own vectorizer.
    pub fn load(root: &Path, mode: ClassifierMode, ensemble: &[String]) -> Result<Self> {
        let fake_news_dir = root.join("fake_news");
        let fake_news = match mode {
            ClassifierMode::Single => FakeNewsClassifier::load_single(&fake_news_dir),
            ClassifierMode::Ensemble => FakeNewsClassifier::load_ensemble(&fake_news_dir, ensemble),
        }
        .context("Failed to load fake-news classifier")?;

        let readability = ReadabilityScorer::load(&root.join("readability"))
            .context("Failed to load readability scorer")?;
        let sentiment = SentimentClassifier::load(&root.join("sentiment"))
            .context("Failed to load sentiment classifier")?;

        info!(root = %root.display(), ?mode, "model artifacts loaded");
        Ok(Self::new(fake_news, readability, sentiment))
    }

    pub fn from_config(config: &ModelsConfig) -> Result<Self> {
        Self::load(Path::new(&config.path), config.classifier_mode, &config.ensemble)
    }

    pub fn fake_news(&self) -> &FakeNewsClassifier {
        &self.fake_news
    }

    pub fn readability(&self) -> &ReadabilityScorer {
        &self.readability
    }

    pub fn sentiment(&self) -> &SentimentClassifier {
        &self.sentiment
    }
}
