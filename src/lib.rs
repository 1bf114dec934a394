//! # Cardiolens
//!
//! Local heart-disease risk assessment.
//!
//! This crate provides:
//! - Alignment of entered vitals to a classifier's fitted column schema
//! - Scoring through a pre-trained scaler and classifier loaded from disk
//! - Three-band risk tiering with fixed recommendations
//! - A one-page PDF report per assessment
//! - Terminal UI for local-only use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and pure logic (patient input, feature alignment, tiers, report layout)
//! - `ports`: Trait definitions for the scaler, classifier and report renderer
//! - `adapters`: Concrete implementations (JSON model artifacts, printpdf, log sanitization)
//! - `application`: The per-submission assessment service
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;

pub use domain::{PatientInput, RiskAssessment, RiskLevel};

/// Result type for Cardiolens operations
pub type Result<T> = std::result::Result<T, CardiolensError>;

/// Main error type for Cardiolens
#[derive(Debug, thiserror::Error)]
pub enum CardiolensError {
    #[error("Model error: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Report error: {0}")]
    Report(#[from] domain::ReportError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
