//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Feature alignment, risk tiering and report layout all live here
//! as deterministic functions over in-memory values.

mod errors;
mod features;
mod patient;
mod report;
mod risk;

pub use errors::{ModelError, ReportError};
pub use features::{DropReason, DroppedColumn, EnteredFeatures, FeatureSchema, FeatureVector};
pub use patient::{
    Categorical, ChestPainType, ExerciseAngina, PatientInput, RestingEcg, Sex, StSlope,
    AGE_RANGE, CHOLESTEROL_RANGE, MAX_HR_RANGE, OLDPEAK_RANGE, RESTING_BP_RANGE,
};
pub use report::{
    report_file_name, FontWeight, GeneratedReport, MedicalReport, TextLine, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, REPORT_TITLE,
};
pub use risk::{risk_percent, RiskAssessment, RiskLevel};
