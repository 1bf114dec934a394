//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the per-submission assessment flow.

mod assessment;
mod bundle;

pub use assessment::{AssessmentService, Submission};
pub use bundle::ModelBundle;
