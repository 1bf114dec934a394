//! Assessment result view.

use std::path::PathBuf;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::Submission;
use crate::tui::styles::ClinicTheme;

/// Outcome of the last `[D]` press.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum ResultState {
    Complete {
        submission: Submission,
        status: String,
        saved: Option<SaveStatus>,
    },
    Error {
        message: String,
    },
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Complete {
            submission,
            status,
            saved,
        } => render_assessment(f, chunks[1], submission, status, saved.as_ref()),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("AI Diagnosis Report", ClinicTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_assessment(
    f: &mut Frame,
    area: Rect,
    submission: &Submission,
    status: &str,
    saved: Option<&SaveStatus>,
) {
    let assessment = &submission.assessment;
    let risk_style = ClinicTheme::risk_level(assessment.level);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Probability gauge
            Constraint::Length(3), // Status message
            Constraint::Min(4),    // Advice
            Constraint::Length(2), // Save status
        ])
        .margin(1)
        .split(inner);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Predicted Risk Probability ",
                    ClinicTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(u16::from(assessment.risk_percent))
        .label(format!("{}%", assessment.risk_percent));
    f.render_widget(gauge, chunks[0]);

    let status = Paragraph::new(Line::from(Span::styled(status.to_string(), risk_style)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(status, chunks[1]);

    let mut advice = vec![Line::from(Span::styled(
        "Recommendation",
        ClinicTheme::title(),
    ))];
    advice.extend(
        assessment
            .advice_lines()
            .map(|line| Line::from(Span::styled(format!("  • {line}"), ClinicTheme::text()))),
    );
    f.render_widget(Paragraph::new(advice), chunks[2]);

    let save_line = match saved {
        Some(SaveStatus::Saved(path)) => Line::from(Span::styled(
            format!("Report saved to {}", path.display()),
            ClinicTheme::success(),
        )),
        Some(SaveStatus::Failed(message)) => Line::from(Span::styled(
            format!("! Could not save report: {message}"),
            ClinicTheme::danger(),
        )),
        None => Line::from(Span::styled(
            format!("Report ready: {}", submission.report.file_name),
            ClinicTheme::text_muted(),
        )),
    };
    f.render_widget(Paragraph::new(save_line), chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", ClinicTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClinicTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Complete { .. } => Line::from(vec![
            Span::styled("[D] ", ClinicTheme::key_hint()),
            Span::styled("Download Full Medical Report ", ClinicTheme::key_desc()),
            Span::styled("[N] ", ClinicTheme::key_hint()),
            Span::styled("New Patient ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Edit ", ClinicTheme::key_desc()),
            Span::styled("[Q] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ]),
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Back to Form ", ClinicTheme::key_desc()),
            Span::styled("[Q] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
