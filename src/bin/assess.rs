//! Non-interactive assessment of a patient JSON file.
//!
//! Prints the assessment as JSON on stdout and writes the PDF report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cardiolens-assess -- --input <patient.json> \
//!     [--out-dir <dir>] [--models <dir>] [--date YYYY-MM-DD]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use cardiolens::adapters::{load_bundle, save_report, LoadOptions, PdfReportRenderer};
use cardiolens::application::AssessmentService;
use cardiolens::config::{AppConfig, LogMode};
use cardiolens::{logging, CardiolensError, PatientInput, RiskAssessment};

const USAGE: &str = "Usage: cardiolens-assess --input <patient.json> [--out-dir <dir>] [--models <dir>] [--date YYYY-MM-DD]";

struct Args {
    input: PathBuf,
    out_dir: Option<PathBuf>,
    models: Option<PathBuf>,
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    assessment: &'a RiskAssessment,
    status: String,
    report: PathBuf,
}

fn usage_exit() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2);
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut input = None;
    let mut out_dir = None;
    let mut models = None;
    let mut date = None;

    while let Some(arg) = args.next() {
        let mut value = || args.next().filter(|v| !v.is_empty()).unwrap_or_else(|| usage_exit());
        match arg.as_str() {
            "--input" => input = Some(PathBuf::from(value())),
            "--out-dir" => out_dir = Some(PathBuf::from(value())),
            "--models" => models = Some(PathBuf::from(value())),
            "--date" => {
                let raw = value();
                let parsed = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date {raw:?}, expected YYYY-MM-DD"))?;
                date = Some(parsed);
            }
            "-h" | "--help" => {
                println!("{USAGE}\n\nScores one patient with the model bundle and writes the PDF report.");
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown arg: {arg}");
                usage_exit();
            }
        }
    }

    let Some(input) = input else { usage_exit() };
    Ok(Args {
        input,
        out_dir,
        models,
        date,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = AppConfig::from_env();

    // stdout carries the JSON result.
    let log_mode = match config.log_mode {
        LogMode::Auto | LogMode::Stdout => LogMode::Stderr,
        other => other,
    };
    let _guard = logging::init(log_mode, &config.log_file)
        .with_context(|| format!("failed to open log file {:?}", config.log_file))?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {:?}", args.input))?;
    let patient: PatientInput = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse patient JSON in {:?}", args.input))?;
    patient
        .validate()
        .map_err(|errors| CardiolensError::Validation(errors.join("; ")))?;

    let model_path = args.models.unwrap_or(config.model_path);
    let options = LoadOptions {
        allow_unverified: config.allow_unverified_models,
    };
    let bundle = load_bundle(&model_path, options)
        .with_context(|| format!("failed to load model from {model_path:?}"))?;
    let service = AssessmentService::new(Arc::new(bundle), Arc::new(PdfReportRenderer::new()));

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let submission = service.handle_submission(&patient, date)?;

    let out_dir = args.out_dir.unwrap_or(config.report_dir);
    let report = save_report(&out_dir, &submission.report)?;

    let output = Output {
        assessment: &submission.assessment,
        status: submission.assessment.level.status_message(&patient.name),
        report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
