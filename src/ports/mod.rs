//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the assessment pipeline and the pre-trained model artifacts and
//! the document renderer.

mod model;
mod report;

pub use model::{FeatureScaler, RiskClassifier};
pub use report::ReportRenderer;
