use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use super::vectorizer::SparseVector;

#[derive(Debug, Deserialize)]
struct ClassifierArtifact {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RegressorArtifact {
    coef: Vec<f64>,
    intercept: f64,
}

/// Linear classifier whose class names have been resolved into labels of type `L`.
///
/// Binary models carry one coefficient row: a positive decision value selects the
/// second class. Multiclass models carry one row per class and pick the argmax.
#[derive(Debug, Clone)]
pub struct LinearClassifier<L> {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    labels: Vec<L>,
}

impl<L> LinearClassifier<L>
where
    L: FromStr + Copy,
    L::Err: Display,
{
    pub fn new(classes: &[&str], coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self> {
        let labels = classes
            .iter()
            .map(|c| L::from_str(c).map_err(|e| anyhow::anyhow!("unknown class '{}': {}", c, e)))
            .collect::<Result<Vec<L>>>()?;

        if labels.len() < 2 {
            anyhow::bail!("classifier needs at least two classes, got {}", labels.len());
        }
        let expected_rows = if labels.len() == 2 { 1 } else { labels.len() };
        if coef.len() != expected_rows {
            anyhow::bail!(
                "{} classes need {} coefficient rows, got {}",
                labels.len(),
                expected_rows,
                coef.len()
            );
        }
        if intercept.len() != coef.len() {
            anyhow::bail!("{} intercepts for {} coefficient rows", intercept.len(), coef.len());
        }

        Ok(Self {
            coef,
            intercept,
            labels,
        })
    }

    /// Load from JSON, checking every coefficient row has `width` columns.
    pub fn from_file(path: &Path, width: usize) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read classifier: {}", path.display()))?;
        let artifact: ClassifierArtifact = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse classifier: {}", path.display()))?;

        let classes: Vec<&str> = artifact.classes.iter().map(String::as_str).collect();
        let model = Self::new(&classes, artifact.coef, artifact.intercept)
            .with_context(|| format!("Invalid classifier: {}", path.display()))?;
        model
            .check_width(width)
            .with_context(|| format!("Classifier does not match its vectorizer: {}", path.display()))?;
        Ok(model)
    }

    pub fn check_width(&self, width: usize) -> Result<()> {
        for (i, row) in self.coef.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("coefficient row {} has {} columns, expected {}", i, row.len(), width);
            }
        }
        Ok(())
    }

    pub fn predict(&self, row: &SparseVector) -> L {
        let decision = |r: usize| {
            let weights = &self.coef[r];
            row.iter()
                .filter_map(|&(idx, value)| weights.get(idx).map(|w| w * value))
                .sum::<f64>()
                + self.intercept[r]
        };

        if self.coef.len() == 1 {
            return if decision(0) > 0.0 {
                self.labels[1]
            } else {
                self.labels[0]
            };
        }

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for r in 0..self.coef.len() {
            let score = decision(r);
            if score > best_score {
                best = r;
                best_score = score;
            }
        }
        self.labels[best]
    }
}

/// Linear regressor over a dense row.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coef: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    pub fn from_file(path: &Path, width: usize) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read regressor: {}", path.display()))?;
        let artifact: RegressorArtifact = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse regressor: {}", path.display()))?;
        if artifact.coef.len() != width {
            anyhow::bail!(
                "Regressor {} has {} coefficients, expected {}",
                path.display(),
                artifact.coef.len(),
                width
            );
        }
        Ok(Self::new(artifact.coef, artifact.intercept))
    }

    pub fn width(&self) -> usize {
        self.coef.len()
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}
