//! Feature alignment between entered vitals and a fitted column schema.
//!
//! Categorical fields are one-hot encoded with a `prefix_value` naming
//! convention (`Sex_M`, `ST_Slope_Up`, ...). A classifier only knows the
//! columns it was fitted against, so the sparse entered mapping is projected
//! onto that schema: missing columns become 0 and unknown columns are dropped.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::errors::ModelError;

/// Sparse mapping of entered feature columns to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnteredFeatures(BTreeMap<String, f64>);

impl EnteredFeatures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw numeric column.
    pub fn set(&mut self, column: impl Into<String>, value: f64) {
        self.0.insert(column.into(), value);
    }

    /// Set the indicator column `{prefix}_{level}` to 1.
    pub fn set_one_hot(&mut self, prefix: &str, level: &str) {
        self.set(format!("{prefix}_{level}"), 1.0);
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.0.get(column).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EnteredFeatures {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Why an entered column was left out of the aligned vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The schema has sibling columns with the same prefix; this level is
    /// the implicit reference category (all siblings 0).
    ReferenceLevel,
    /// No schema column shares this column's prefix.
    UnknownFeature,
}

/// An entered column that the schema does not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedColumn {
    pub column: String,
    pub reason: DropReason,
}

/// Ordered list of columns a classifier was fitted against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from an ordered column list.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if the list is empty or has duplicates.
    pub fn new(columns: Vec<String>) -> Result<Self, ModelError> {
        if columns.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "column schema must not be empty".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "duplicate column in schema: {column}"
                )));
            }
        }

        Ok(Self { columns })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Project entered features onto this schema.
    ///
    /// Exactly one value per schema column, in schema order. Columns absent
    /// from `entered` are 0; entered columns outside the schema are dropped.
    #[must_use]
    pub fn align(&self, entered: &EnteredFeatures) -> FeatureVector {
        let values = self
            .columns
            .iter()
            .map(|column| entered.get(column).unwrap_or(0.0))
            .collect();

        FeatureVector {
            columns: self.columns.clone(),
            values,
        }
    }

    /// Entered columns that `align` discards, with the reason for each.
    #[must_use]
    pub fn dropped_columns(&self, entered: &EnteredFeatures) -> Vec<DroppedColumn> {
        entered
            .columns()
            .filter(|column| !self.contains(column))
            .map(|column| {
                let reason = match column.rsplit_once('_') {
                    Some((prefix, _)) if self.has_prefix(prefix) => DropReason::ReferenceLevel,
                    _ => DropReason::UnknownFeature,
                };
                DroppedColumn {
                    column: column.to_string(),
                    reason,
                }
            })
            .collect()
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.rsplit_once('_').is_some_and(|(p, level)| p == prefix && !level.is_empty()))
    }
}

/// Dense feature vector aligned to a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a named column, if the schema has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn schema(columns: &[&str]) -> FeatureSchema {
        FeatureSchema::new(columns.iter().map(|c| (*c).to_string()).collect())
            .expect("valid schema")
    }

    #[test]
    fn test_schema_rejects_empty_and_duplicates() {
        assert!(FeatureSchema::new(Vec::new()).is_err());
        assert!(FeatureSchema::new(vec!["Age".into(), "Age".into()]).is_err());
    }

    #[test]
    fn test_align_zero_fills_and_reorders() {
        let schema = schema(&["Sex_M", "Age", "ST_Slope_Up", "ST_Slope_Flat"]);
        let entered: EnteredFeatures = [("Age", 52.0), ("ST_Slope_Up", 1.0)].into_iter().collect();

        let vector = schema.align(&entered);

        assert_eq!(vector.columns(), schema.columns());
        assert_eq!(vector.values(), &[0.0, 52.0, 1.0, 0.0]);
    }

    #[test]
    fn test_align_drops_level_missing_from_schema() {
        // Drop-first schema: Sex_F is the reference level.
        let schema = schema(&["Age", "Sex_M"]);
        let mut entered = EnteredFeatures::new();
        entered.set("Age", 61.0);
        entered.set_one_hot("Sex", "F");

        let vector = schema.align(&entered);

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get("Sex_F"), None);
        assert_eq!(vector.get("Sex_M"), Some(0.0));
        assert_eq!(
            schema.dropped_columns(&entered),
            vec![DroppedColumn {
                column: "Sex_F".into(),
                reason: DropReason::ReferenceLevel,
            }]
        );
    }

    #[test]
    fn test_misspelled_level_is_silently_dropped() {
        // "Male" is not a level the schema was built with; the aligner treats it
        // exactly like the reference level, but it is still reported.
        let schema = schema(&["Age", "Sex_F", "Sex_M"]);
        let mut entered = EnteredFeatures::new();
        entered.set_one_hot("Sex", "Male");

        let vector = schema.align(&entered);

        assert_eq!(vector.values(), &[0.0, 0.0, 0.0]);
        assert_eq!(
            schema.dropped_columns(&entered)[0].reason,
            DropReason::ReferenceLevel
        );
    }

    #[test]
    fn test_dropped_feature_without_schema_prefix_is_unknown() {
        let schema = schema(&["Age", "Sex_M"]);
        let entered: EnteredFeatures = [("Smoker_Y", 1.0), ("Weight", 80.0)].into_iter().collect();

        let dropped = schema.dropped_columns(&entered);

        assert_eq!(dropped.len(), 2);
        assert!(dropped.iter().all(|d| d.reason == DropReason::UnknownFeature));
    }

    #[test]
    fn test_prefix_match_requires_separator() {
        // "ST" must not claim "ST_Slope_Up" as a sibling.
        let schema = schema(&["ST_Slope_Up"]);
        let entered: EnteredFeatures = [("ST_X", 1.0)].into_iter().collect();
        assert_eq!(
            schema.dropped_columns(&entered)[0].reason,
            DropReason::UnknownFeature
        );
    }

    #[test]
    fn test_sibling_prefix_must_match_whole() {
        let schema = schema(&["ST_Slope_Up", "ST_Slope_Flat"]);
        let entered: EnteredFeatures = [("ST_Slope_Down", 1.0), ("ST_Depression", 1.0)]
            .into_iter()
            .collect();

        let reasons: Vec<_> = schema
            .dropped_columns(&entered)
            .into_iter()
            .map(|d| (d.column, d.reason))
            .collect();

        assert_eq!(
            reasons,
            [
                ("ST_Depression".to_string(), DropReason::UnknownFeature),
                ("ST_Slope_Down".to_string(), DropReason::ReferenceLevel),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_aligned_vector_matches_schema(
            columns in proptest::collection::hash_set("[A-Za-z]{1,6}(_[A-Za-z]{1,4})?", 1..12),
            entered in proptest::collection::btree_map("[A-Za-z]{1,6}(_[A-Za-z]{1,4})?", -500.0f64..500.0, 0..16),
        ) {
            let schema = FeatureSchema::new(columns.into_iter().collect()).unwrap();
            let entered: EnteredFeatures = entered.into_iter().collect();

            let vector = schema.align(&entered);

            prop_assert_eq!(vector.len(), schema.len());
            prop_assert_eq!(vector.columns(), schema.columns());
            for (column, value) in vector.iter() {
                prop_assert_eq!(value, entered.get(column).unwrap_or(0.0));
            }
            for dropped in schema.dropped_columns(&entered) {
                prop_assert!(vector.get(&dropped.column).is_none());
            }
        }
    }
}
