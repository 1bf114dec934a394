//! Writes generated reports into the report directory.

use std::path::{Path, PathBuf};

use crate::domain::{GeneratedReport, ReportError};

/// Write `report` into `dir`, creating the directory if needed.
///
/// An existing file with the same name is replaced.
///
/// # Errors
/// Returns `ReportError::Io` if the directory or file cannot be written.
pub fn save_report(dir: &Path, report: &GeneratedReport) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&report.file_name);
    std::fs::write(&path, &report.bytes)?;
    tracing::info!("Report saved to {:?} ({} bytes)", dir, report.bytes.len());
    Ok(path)
}
