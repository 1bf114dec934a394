//! Cardiolens: local heart-disease risk assessment.
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};

use cardiolens::config::AppConfig;
use cardiolens::logging;
use cardiolens::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let _guard = logging::init(config.log_mode, &config.log_file)
        .with_context(|| format!("failed to open log file {:?}", config.log_file))?;

    tracing::info!("Starting Cardiolens...");

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("Cardiolens shutdown complete.");
    Ok(())
}
