use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use super::linear::LinearClassifier;
use super::vectorizer::TfIdfVectorizer;
use super::{ClassificationResult, FakeNewsLabel, SentimentLabel};

/// Fake-news classifier(s) sharing one vectorizer.
#[derive(Debug, Clone)]
pub struct FakeNewsClassifier {
    vectorizer: TfIdfVectorizer,
    models: FakeNewsModels,
}

#[derive(Debug, Clone)]
enum FakeNewsModels {
    Single(LinearClassifier<FakeNewsLabel>),
    Ensemble(Vec<(String, LinearClassifier<FakeNewsLabel>)>),
}

impl FakeNewsClassifier {
    pub fn single(vectorizer: TfIdfVectorizer, model: LinearClassifier<FakeNewsLabel>) -> Result<Self> {
        model.check_width(vectorizer.dimension())?;
        Ok(Self {
            vectorizer,
            models: FakeNewsModels::Single(model),
        })
    }

    pub fn ensemble(
        vectorizer: TfIdfVectorizer,
        members: Vec<(String, LinearClassifier<FakeNewsLabel>)>,
    ) -> Result<Self> {
        if members.is_empty() {
            anyhow::bail!("ensemble mode needs at least one classifier");
        }
        for (name, model) in &members {
            model
                .check_width(vectorizer.dimension())
                .with_context(|| format!("ensemble member '{}'", name))?;
        }
        Ok(Self {
            vectorizer,
            models: FakeNewsModels::Ensemble(members),
        })
    }

    /// Load `vectorizer.json` plus `model.json` from `dir`.
    pub fn load_single(dir: &Path) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::from_file(&dir.join("vectorizer.json"))?;
        let model = LinearClassifier::from_file(&dir.join("model.json"), vectorizer.dimension())?;
        Self::single(vectorizer, model)
    }

    /// Load `vectorizer.json` plus `<name>.json` for every member name.
    pub fn load_ensemble(dir: &Path, names: &[String]) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::from_file(&dir.join("vectorizer.json"))?;
        let members = names
            .iter()
            .map(|name| {
                let path = dir.join(format!("{}.json", name));
                LinearClassifier::from_file(&path, vectorizer.dimension()).map(|m| (name.clone(), m))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::ensemble(vectorizer, members)
    }

    pub fn is_ensemble(&self) -> bool {
        matches!(self.models, FakeNewsModels::Ensemble(_))
    }

    pub fn classify(&self, text: &str) -> ClassificationResult<FakeNewsLabel> {
        let row = self.vectorizer.transform(text);
        match &self.models {
            FakeNewsModels::Single(model) => ClassificationResult::Single(model.predict(&row)),
            FakeNewsModels::Ensemble(members) => ClassificationResult::Ensemble(
                members
                    .iter()
                    .map(|(name, model)| (name.clone(), model.predict(&row)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

/// Sentiment classifier with its own vectorizer.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    vectorizer: TfIdfVectorizer,
    model: LinearClassifier<SentimentLabel>,
}

impl SentimentClassifier {
    pub fn new(vectorizer: TfIdfVectorizer, model: LinearClassifier<SentimentLabel>) -> Result<Self> {
        model.check_width(vectorizer.dimension())?;
        Ok(Self { vectorizer, model })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::from_file(&dir.join("vectorizer.json"))?;
        let model = LinearClassifier::from_file(&dir.join("classifier.json"), vectorizer.dimension())?;
        Self::new(vectorizer, model)
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        self.model.predict(&self.vectorizer.transform(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vectorizer() -> TfIdfVectorizer {
        let vocab: HashMap<String, usize> = [("hoax", 0), ("official", 1)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        TfIdfVectorizer::new(vocab, vec![1.0, 1.0]).unwrap()
    }

    fn model(w: [f64; 2]) -> LinearClassifier<FakeNewsLabel> {
        LinearClassifier::new(&["Fake", "Real"], vec![w.to_vec()], vec![0.0]).unwrap()
    }

    #[test]
    fn test_single_mode() {
        let c = FakeNewsClassifier::single(vectorizer(), model([-1.0, 1.0])).unwrap();
        assert!(!c.is_ensemble());
        assert_eq!(c.classify("a total hoax"), ClassificationResult::Single(FakeNewsLabel::Fake));
        assert_eq!(c.classify("official statement"), ClassificationResult::Single(FakeNewsLabel::Real));
    }

    #[test]
    fn test_ensemble_reports_every_member() {
        let c = FakeNewsClassifier::ensemble(
            vectorizer(),
            vec![
                ("logistic_regression".to_string(), model([-1.0, 1.0])),
                ("contrarian".to_string(), model([1.0, -1.0])),
            ],
        )
        .unwrap();

        match c.classify("hoax") {
            ClassificationResult::Ensemble(labels) => {
                assert_eq!(labels.len(), 2);
                assert_eq!(labels["logistic_regression"], FakeNewsLabel::Fake);
                assert_eq!(labels["contrarian"], FakeNewsLabel::Real);
            }
            other => panic!("expected ensemble result, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert!(FakeNewsClassifier::ensemble(vectorizer(), vec![]).is_err());
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let wide = LinearClassifier::new(&["Fake", "Real"], vec![vec![1.0, 1.0, 1.0]], vec![0.0]).unwrap();
        assert!(FakeNewsClassifier::single(vectorizer(), wide).is_err());
    }
}
