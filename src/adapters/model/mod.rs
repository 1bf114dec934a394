//! Model artifact adapter: loads the fitted schema, scaler and classifier.
//!
//! A model directory contains:
//! - `columns.json`: ordered column names the classifier was fitted on
//! - `scaler.json`: standard scaler parameters
//! - `classifier.json`: classifier parameters, tagged by `kind`
//! - `manifest.json`: SHA-256 digests binding the three artifacts
//!
//! # Integrity
//!
//! Every artifact is read once into memory, its digest checked against the
//! manifest, and only then parsed. The bytes that are verified are the bytes
//! that are loaded. Loading without a manifest requires an explicit opt-in
//! (`CARDIOLENS_ALLOW_UNVERIFIED_MODELS=true`).

mod classifier;
mod scaler;

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::application::ModelBundle;
use crate::domain::{FeatureSchema, ModelError};

pub use classifier::{ClassifierModel, KnnClassifier, KnnWeights, LogisticClassifier};
pub use scaler::StandardScaler;

pub const COLUMNS_FILE: &str = "columns.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// The bundle type produced from on-disk artifacts.
pub type LoadedBundle = ModelBundle<StandardScaler, ClassifierModel>;

/// Options controlling artifact loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Accept a model directory without `manifest.json`.
    pub allow_unverified: bool,
}

/// Digests of the artifacts in a model directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Build a manifest for in-memory artifacts.
    #[must_use]
    pub fn for_artifacts(artifacts: &[(&str, &[u8])]) -> Self {
        Self {
            version: MANIFEST_VERSION,
            files: artifacts
                .iter()
                .map(|(name, bytes)| ((*name).to_string(), sha256_hex(bytes)))
                .collect(),
        }
    }

    fn verify(&self, name: &str, bytes: &[u8]) -> Result<(), ModelError> {
        let expected = self.files.get(name).ok_or_else(|| {
            ModelError::Integrity(format!("{MANIFEST_FILE} does not list {name}"))
        })?;
        let actual = sha256_hex(bytes);
        if !constant_time_eq_str(&expected.to_ascii_lowercase(), &actual) {
            tracing::error!("Digest mismatch for model artifact {}", name);
            return Err(ModelError::Integrity(format!(
                "digest mismatch for {name}"
            )));
        }
        Ok(())
    }
}

/// Load and verify the model bundle from a directory.
///
/// # Errors
/// Returns `ModelError` if any artifact is missing, unverifiable, malformed,
/// or inconsistent with the column schema.
pub fn load_bundle(model_dir: &Path, options: LoadOptions) -> Result<LoadedBundle, ModelError> {
    if !model_dir.is_dir() {
        return Err(ModelError::InvalidArtifact(format!(
            "model directory not found: {model_dir:?}"
        )));
    }

    let manifest = read_manifest(model_dir)?;
    match (&manifest, options.allow_unverified) {
        (Some(_), _) => {}
        (None, true) => tracing::warn!(
            "Loading UNVERIFIED model artifacts from {:?} (no {MANIFEST_FILE})",
            model_dir
        ),
        (None, false) => {
            tracing::error!("No {MANIFEST_FILE} found in {:?}", model_dir);
            return Err(ModelError::Integrity(format!(
                "{MANIFEST_FILE} required. Set CARDIOLENS_ALLOW_UNVERIFIED_MODELS=true to bypass."
            )));
        }
    }

    let read_verified = |name: &str| -> Result<Vec<u8>, ModelError> {
        let bytes = read_artifact(model_dir, name)?;
        if let Some(manifest) = &manifest {
            manifest.verify(name, &bytes)?;
        }
        Ok(bytes)
    };

    let columns: Vec<String> = parse_artifact(COLUMNS_FILE, &read_verified(COLUMNS_FILE)?)?;
    let schema = FeatureSchema::new(columns)?;

    let scaler: StandardScaler = parse_artifact(SCALER_FILE, &read_verified(SCALER_FILE)?)?;
    scaler.validate()?;

    let classifier: ClassifierModel =
        parse_artifact(CLASSIFIER_FILE, &read_verified(CLASSIFIER_FILE)?)?;
    classifier.validate()?;
    let kind = classifier.kind();

    let bundle = ModelBundle::new(schema, scaler, classifier)?;

    tracing::info!(
        "Loaded model from {:?} (classifier={}, n_features={}, verified={})",
        model_dir,
        kind,
        bundle.schema().len(),
        manifest.is_some()
    );

    Ok(bundle)
}

fn read_manifest(dir: &Path) -> Result<Option<ArtifactManifest>, ModelError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = read_artifact(dir, MANIFEST_FILE)?;
    let manifest: ArtifactManifest = parse_artifact(MANIFEST_FILE, &bytes)?;
    if manifest.version != MANIFEST_VERSION {
        return Err(ModelError::Integrity(format!(
            "unsupported manifest version {}",
            manifest.version
        )));
    }
    Ok(Some(manifest))
}

fn read_artifact(dir: &Path, name: &str) -> Result<Vec<u8>, ModelError> {
    let path = dir.join(name);
    std::fs::read(&path).map_err(|source| ModelError::Io { path, source })
}

fn parse_artifact<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T, ModelError> {
    serde_json::from_slice(bytes).map_err(|e| ModelError::Parse {
        artifact: name.to_string(),
        message: e.to_string(),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
