//! Model ports: the fitted scaler and the scored binary classifier.
//!
//! Both are opaque to the pipeline. The only contract is dimensionality and
//! determinism: identical input and artifacts give identical output.

use crate::domain::{FeatureVector, ModelError};

/// Normalization applied to an aligned feature vector before scoring.
pub trait FeatureScaler: Send + Sync {
    /// Number of features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Scale an aligned feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the vector length differs
    /// from `n_features()`.
    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;
}

/// Binary classifier returning the probability of the positive class.
pub trait RiskClassifier: Send + Sync {
    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Probability in `[0, 1]` that heart disease is present.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the input length differs
    /// from `n_features()`.
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError>;
}
