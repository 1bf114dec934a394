//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Calling the assessment service on submit

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::model::{ClassifierModel, StandardScaler};
use crate::adapters::{load_bundle, save_report, LoadOptions, PdfReportRenderer};
use crate::application::AssessmentService;
use crate::config::AppConfig;

use super::ui::{
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState, SaveStatus},
};

/// The service as wired for the terminal application.
pub type TuiService = AssessmentService<StandardScaler, ClassifierModel, PdfReportRenderer>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PatientForm,
    Result,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: TuiService,
    report_dir: PathBuf,
    patient_form_state: PatientFormState,
    result_state: Option<ResultState>,
    /// Fixed report date for tests; `None` uses today's local date.
    report_date: Option<NaiveDate>,
}

impl App {
    /// Load the model bundle and build the application.
    ///
    /// # Errors
    /// Returns error if the model directory cannot be loaded or verified.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let options = LoadOptions {
            allow_unverified: config.allow_unverified_models,
        };
        // Refuse to start without a loadable, verified model.
        let bundle = load_bundle(&config.model_path, options).with_context(|| {
            format!(
                "Failed to load model from {:?}. Set CARDIOLENS_MODEL_PATH to a directory containing columns.json, scaler.json, classifier.json and manifest.json.",
                config.model_path
            )
        })?;

        let service = AssessmentService::new(Arc::new(bundle), Arc::new(PdfReportRenderer::new()));
        Ok(Self::with_service(service, config.report_dir.clone()))
    }

    /// Create application with an injected service (Composition Root pattern).
    #[must_use]
    pub fn with_service(service: TuiService, report_dir: PathBuf) -> Self {
        Self {
            screen: Screen::PatientForm,
            should_quit: false,
            service,
            report_dir,
            patient_form_state: PatientFormState::default(),
            result_state: None,
            report_date: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match (&self.screen, &self.result_state) {
                    (Screen::Result, Some(state)) => render_result(f, chunks[0], state),
                    _ => render_patient_form(f, chunks[0], &self.patient_form_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        let form = &mut self.patient_form_state;
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => form.prev_field(),
            KeyCode::Down | KeyCode::Tab => form.next_field(),
            KeyCode::Left => form.adjust(false),
            KeyCode::Right => form.adjust(true),
            KeyCode::F(2) => form.load_sample_data(),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Delete => form.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('d') | KeyCode::Char('D') => self.download_report(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.patient_form_state.clear_sensitive();
                self.result_state = None;
                self.screen = Screen::PatientForm;
            }
            KeyCode::Esc => {
                self.result_state = None;
                self.screen = Screen::PatientForm;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn submit_patient_form(&mut self) {
        let patient = match self.patient_form_state.to_patient_input() {
            Ok(patient) => patient,
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
                return;
            }
        };

        let date = self.report_date.unwrap_or_else(|| Local::now().date_naive());
        self.result_state = Some(match self.service.handle_submission(&patient, date) {
            Ok(submission) => ResultState::Complete {
                status: submission.assessment.level.status_message(&patient.name),
                submission,
                saved: None,
            },
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        });
        self.screen = Screen::Result;
    }

    fn download_report(&mut self) {
        let Some(ResultState::Complete {
            submission, saved, ..
        }) = &mut self.result_state
        else {
            return;
        };

        *saved = Some(match save_report(&self.report_dir, &submission.report) {
            Ok(path) => SaveStatus::Saved(path),
            Err(e) => {
                tracing::error!("Failed to save report: {}", e);
                SaveStatus::Failed(e.to_string())
            }
        });
    }
}
