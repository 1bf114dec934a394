//! The fitted model bundle: schema, scaler and classifier loaded together.

use crate::domain::{FeatureSchema, ModelError};
use crate::ports::{FeatureScaler, RiskClassifier};

/// Immutable model configuration shared by every submission.
///
/// Construction checks that the scaler and classifier agree with the
/// column schema, so scoring an aligned vector never changes dimension.
#[derive(Debug, Clone)]
pub struct ModelBundle<S, C> {
    schema: FeatureSchema,
    scaler: S,
    classifier: C,
}

impl<S, C> ModelBundle<S, C>
where
    S: FeatureScaler,
    C: RiskClassifier,
{
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the scaler or classifier was
    /// fitted on a different number of features than the schema lists.
    pub fn new(schema: FeatureSchema, scaler: S, classifier: C) -> Result<Self, ModelError> {
        if scaler.n_features() != schema.len() {
            return Err(ModelError::DimensionMismatch {
                expected: schema.len(),
                got: scaler.n_features(),
            });
        }
        if classifier.n_features() != schema.len() {
            return Err(ModelError::DimensionMismatch {
                expected: schema.len(),
                got: classifier.n_features(),
            });
        }
        Ok(Self {
            schema,
            scaler,
            classifier,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}
