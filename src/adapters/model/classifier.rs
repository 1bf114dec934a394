//! Classifiers exported from the training pipeline.
//!
//! `classifier.json` is tagged by `kind`:
//! - `knn`: stored training samples (already scaled) with 0/1 labels
//! - `logistic`: linear coefficients and intercept

use serde::{Deserialize, Serialize};

use crate::domain::ModelError;
use crate::ports::RiskClassifier;

/// Any classifier that can be loaded from `classifier.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierModel {
    Knn(KnnClassifier),
    Logistic(LogisticClassifier),
}

impl ClassifierModel {
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if parameters are inconsistent.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Knn(model) => model.validate(),
            Self::Logistic(model) => model.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Knn(_) => "knn",
            Self::Logistic(_) => "logistic",
        }
    }
}

impl RiskClassifier for ClassifierModel {
    fn n_features(&self) -> usize {
        match self {
            Self::Knn(model) => model.n_features(),
            Self::Logistic(model) => model.n_features(),
        }
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        match self {
            Self::Knn(model) => model.predict_proba(scaled),
            Self::Logistic(model) => model.predict_proba(scaled),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnnWeights {
    /// Each of the k neighbours votes equally.
    #[default]
    Uniform,
    /// Votes weighted by inverse distance.
    Distance,
}

/// k-nearest-neighbours classifier over Euclidean distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnClassifier {
    pub k: usize,
    #[serde(default)]
    pub weights: KnnWeights,
    pub samples: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

impl KnnClassifier {
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if parameters are inconsistent.
    pub fn validate(&self) -> Result<(), ModelError> {
        let Some(first) = self.samples.first() else {
            return Err(ModelError::InvalidArtifact("knn has no samples".into()));
        };
        let n = first.len();
        if n == 0 {
            return Err(ModelError::InvalidArtifact("knn samples are empty".into()));
        }
        if self.samples.iter().any(|s| s.len() != n) {
            return Err(ModelError::InvalidArtifact(
                "knn samples have differing lengths".into(),
            ));
        }
        if self.samples.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "knn samples must be finite".into(),
            ));
        }
        if self.labels.len() != self.samples.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "knn has {} samples but {} labels",
                self.samples.len(),
                self.labels.len()
            )));
        }
        if self.labels.iter().any(|l| *l > 1) {
            return Err(ModelError::InvalidArtifact(
                "knn labels must be 0 or 1".into(),
            ));
        }
        if self.k == 0 || self.k > self.samples.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "knn k={} must be between 1 and {}",
                self.k,
                self.samples.len()
            )));
        }
        Ok(())
    }
}

impl RiskClassifier for KnnClassifier {
    fn n_features(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        let expected = self.n_features();
        if scaled.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                got: scaled.len(),
            });
        }

        let mut neighbours: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (euclidean(sample, scaled), i))
            .collect();
        // Ties keep sample order.
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let nearest = &neighbours[..self.k.min(neighbours.len())];

        let probability = match self.weights {
            KnnWeights::Uniform => {
                let positives = nearest.iter().filter(|(_, i)| self.labels[*i] == 1).count();
                positives as f64 / nearest.len() as f64
            }
            KnnWeights::Distance => {
                let exact: Vec<usize> = nearest
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, i)| *i)
                    .collect();
                if exact.is_empty() {
                    let (positive, total) =
                        nearest.iter().fold((0.0, 0.0), |(pos, tot), (d, i)| {
                            let w = 1.0 / d;
                            let pos = if self.labels[*i] == 1 { pos + w } else { pos };
                            (pos, tot + w)
                        });
                    positive / total
                } else {
                    let positives = exact.iter().filter(|i| self.labels[**i] == 1).count();
                    positives as f64 / exact.len() as f64
                }
            }
        };

        Ok(probability)
    }
}

/// Logistic regression: `sigmoid(intercept + coefficients · x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if parameters are empty or non-finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "logistic model has no coefficients".into(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "logistic parameters must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl RiskClassifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        if scaled.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: scaled.len(),
            });
        }
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(sigmoid(z))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
