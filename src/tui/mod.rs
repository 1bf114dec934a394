//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Patient details and clinical parameter form
//! - Assessment result with report download

mod app;
mod styles;
mod ui;

pub use app::{App, Screen, TuiService};
pub use styles::ClinicTheme;
