//! Error types for the model and report boundaries.

use std::path::PathBuf;

/// Errors raised while loading or applying model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {artifact}: {message}")]
    Parse { artifact: String, message: String },

    #[error("Artifact integrity check failed: {0}")]
    Integrity(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature count mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Errors raised while rendering or exporting a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF render error: {0}")]
    Render(String),

    #[error("Report export failed: {0}")]
    Io(#[from] std::io::Error),
}
