//! Report port: turns a laid-out medical report into document bytes.

use crate::domain::{MedicalReport, ReportError};

pub trait ReportRenderer: Send + Sync {
    /// Render the report to a single-page document.
    ///
    /// # Errors
    /// Returns `ReportError` if the backend fails to embed fonts or serialize.
    fn render(&self, report: &MedicalReport) -> Result<Vec<u8>, ReportError>;
}
