//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `model`: JSON model artifacts with SHA-256 manifest verification
//! - `pdf`: printpdf report rendering
//! - `export`: writing reports to the report directory
//! - `sanitize`: PII filtering for logs

pub mod export;
pub mod model;
pub mod pdf;
pub mod sanitize;

pub use export::save_report;
pub use model::{load_bundle, LoadOptions, LoadedBundle};
pub use pdf::PdfReportRenderer;
