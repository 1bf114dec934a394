//! Standard scaler exported from the training pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, ModelError};
use crate::ports::FeatureScaler;

/// Per-feature standardization: `(x - mean) / scale`.
///
/// A zero scale (constant feature at fit time) divides by 1, as the
/// training library does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check parameter shapes and values.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` on empty, mismatched or non-finite parameters.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.mean.is_empty() {
            return Err(ModelError::InvalidArtifact("scaler has no features".into()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ModelError::InvalidArtifact(
                "scaler parameters must be finite".into(),
            ));
        }
        if self.scale.iter().any(|s| *s < 0.0) {
            return Err(ModelError::InvalidArtifact(
                "scaler scale must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let values = features.values();
        if values.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                got: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
