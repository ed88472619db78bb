use anyhow::Result;
use std::path::Path;

use super::features::{FeatureVector, FEATURE_COLUMNS};
use super::linear::LinearRegressor;
use super::vectorizer::{to_dense, TfIdfVectorizer};

/// Readability regressor over `[features..., tfidf...]` rows.
///
/// The four `FEATURE_COLUMNS` come first, then the dense TF-IDF columns. The
/// regressor must have been trained on exactly this layout with this vectorizer;
/// only the total width can be checked here.
#[derive(Debug, Clone)]
pub struct ReadabilityScorer {
    vectorizer: TfIdfVectorizer,
    regressor: LinearRegressor,
}

impl ReadabilityScorer {
    pub fn new(vectorizer: TfIdfVectorizer, regressor: LinearRegressor) -> Result<Self> {
        let width = FEATURE_COLUMNS.len() + vectorizer.dimension();
        if regressor.width() != width {
            anyhow::bail!(
                "readability regressor expects {} columns, features + vectorizer give {}",
                regressor.width(),
                width
            );
        }
        Ok(Self {
            vectorizer,
            regressor,
        })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::from_file(&dir.join("vectorizer.json"))?;
        let width = FEATURE_COLUMNS.len() + vectorizer.dimension();
        let regressor = LinearRegressor::from_file(&dir.join("regressor.json"), width)?;
        Self::new(vectorizer, regressor)
    }

    /// Model input row for `text`.
    pub fn row(&self, text: &str) -> Vec<f64> {
        let features = FeatureVector::extract(text);
        let lexical = to_dense(&self.vectorizer.transform(text), self.vectorizer.dimension());

        let mut row = Vec::with_capacity(FEATURE_COLUMNS.len() + lexical.len());
        row.extend_from_slice(&features.columns());
        row.extend(lexical);
        row
    }

    pub fn score(&self, text: &str) -> f64 {
        self.regressor.predict(&self.row(text))
    }
}
