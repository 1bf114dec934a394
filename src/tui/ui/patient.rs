//! Patient details and clinical parameter form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    Categorical, ChestPainType, ExerciseAngina, PatientInput, RestingEcg, Sex, StSlope,
    AGE_RANGE, CHOLESTEROL_RANGE, MAX_HR_RANGE, OLDPEAK_RANGE, RESTING_BP_RANGE,
};
use crate::tui::styles::ClinicTheme;

const MAX_TEXT_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text (identity fields)
    Text,
    /// Bounded number; Left/Right step by `step`
    Number {
        min: f64,
        max: f64,
        step: f64,
        integer: bool,
    },
    /// One of a fixed list of codes
    Choice {
        options: Vec<&'static str>,
        selected: usize,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl FormField {
    fn text(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    fn integer(label: &'static str, hint: &'static str, range: (u32, u32), default: u32) -> Self {
        Self {
            label,
            hint,
            value: default.to_string(),
            kind: FieldKind::Number {
                min: f64::from(range.0),
                max: f64::from(range.1),
                step: 1.0,
                integer: true,
            },
        }
    }

    fn choice<T: Categorical>(label: &'static str, default: T) -> Self {
        Self::options(label, T::ALL.iter().map(Categorical::code).collect(), default.index())
    }

    fn options(label: &'static str, options: Vec<&'static str>, selected: usize) -> Self {
        Self {
            label,
            hint: "◀ ▶ to change",
            value: String::new(),
            kind: FieldKind::Choice { options, selected },
        }
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Choice { options, selected } => options
                .iter()
                .enumerate()
                .map(|(i, o)| if i == *selected { format!("[{o}]") } else { format!(" {o} ") })
                .collect::<Vec<_>>()
                .join(""),
            _ => self.value.clone(),
        }
    }

    fn selected_code(&self) -> Option<&'static str> {
        match &self.kind {
            FieldKind::Choice { options, selected } => options.get(*selected).copied(),
            _ => None,
        }
    }

    fn parse_number(&self) -> Result<f64, String> {
        let FieldKind::Number { min, max, integer, .. } = self.kind else {
            return Err(format!("{}: Not a number field", self.label));
        };
        let value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| format!("{}: Invalid number", self.label))?;
        if integer && value.fract() != 0.0 {
            return Err(format!("{}: Must be a whole number", self.label));
        }
        if value < min || value > max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.label, min, max
            ));
        }
        Ok(value)
    }
}

/// Field positions, in display order.
pub mod field {
    pub const NAME: usize = 0;
    pub const PHONE: usize = 1;
    pub const EMAIL: usize = 2;
    pub const AGE: usize = 3;
    pub const RESTING_BP: usize = 4;
    pub const CHOLESTEROL: usize = 5;
    pub const MAX_HR: usize = 6;
    pub const OLDPEAK: usize = 7;
    pub const SEX: usize = 8;
    pub const CHEST_PAIN: usize = 9;
    pub const FASTING_BS: usize = 10;
    pub const RESTING_ECG: usize = 11;
    pub const EXERCISE_ANGINA: usize = 12;
    pub const ST_SLOPE: usize = 13;
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        let defaults = PatientInput::default();
        Self {
            fields: vec![
                FormField::text("Full Name", "as printed on the report"),
                FormField::text("Phone Number", "optional"),
                FormField::text("Email Address", "optional"),
                FormField::integer(
                    "Age",
                    "years (18-100)",
                    (*AGE_RANGE.start(), *AGE_RANGE.end()),
                    defaults.age,
                ),
                FormField::integer(
                    "Resting BP",
                    "mm Hg (80-200)",
                    (*RESTING_BP_RANGE.start(), *RESTING_BP_RANGE.end()),
                    defaults.resting_bp,
                ),
                FormField::integer(
                    "Cholesterol",
                    "mg/dL (100-600)",
                    (*CHOLESTEROL_RANGE.start(), *CHOLESTEROL_RANGE.end()),
                    defaults.cholesterol,
                ),
                FormField::integer(
                    "Max Heart Rate",
                    "bpm (60-220)",
                    (*MAX_HR_RANGE.start(), *MAX_HR_RANGE.end()),
                    defaults.max_hr,
                ),
                FormField {
                    label: "Oldpeak",
                    hint: "ST depression (0.0-6.0)",
                    value: format!("{:.1}", defaults.oldpeak),
                    kind: FieldKind::Number {
                        min: *OLDPEAK_RANGE.start(),
                        max: *OLDPEAK_RANGE.end(),
                        step: 0.1,
                        integer: false,
                    },
                },
                FormField::choice("Sex", defaults.sex),
                FormField::choice("Chest Pain Type", defaults.chest_pain),
                FormField::options(
                    "Fasting BS > 120 mg/dL",
                    vec!["0", "1"],
                    usize::from(defaults.fasting_bs),
                ),
                FormField::choice("Resting ECG", defaults.resting_ecg),
                FormField::choice("Exercise Angina", defaults.exercise_angina),
                FormField::choice("ST Slope", defaults.st_slope),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = match field.kind {
            FieldKind::Text => !c.is_control() && field.value.chars().count() < MAX_TEXT_LEN,
            FieldKind::Number { integer, .. } => {
                c.is_ascii_digit() || (!integer && c == '.' && !field.value.contains('.'))
            }
            FieldKind::Choice { .. } => false,
        };
        if accepted {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Left/Right: cycle a choice or step a number within its bounds.
    pub fn adjust(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        match &mut field.kind {
            FieldKind::Choice { options, selected } => {
                let n = options.len();
                *selected = if forward {
                    (*selected + 1) % n
                } else {
                    (*selected + n - 1) % n
                };
            }
            FieldKind::Number {
                min,
                max,
                step,
                integer,
            } => {
                let current = field.value.trim().parse::<f64>().unwrap_or(*min);
                let next = if forward { current + *step } else { current - *step };
                // Round to the step grid so 0.1 increments stay tidy.
                let next = ((next / *step).round() * *step).clamp(*min, *max);
                field.value = if *integer {
                    format!("{next:.0}")
                } else {
                    format!("{next:.1}")
                };
            }
            FieldKind::Text => return,
        }
        self.error_message = None;
    }

    /// Wipe all field buffers from memory and reset to defaults.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
        *self = Self::default();
    }

    /// Validate and convert to a `PatientInput`.
    ///
    /// # Errors
    /// Returns a message naming the first invalid field.
    pub fn to_patient_input(&self) -> Result<PatientInput, String> {
        let name = self.fields[field::NAME].value.trim().to_string();

        let whole = |index: usize| -> Result<u32, String> {
            // Bounds are checked by parse_number and fit in u32.
            self.fields[index].parse_number().map(|v| v as u32)
        };

        Ok(PatientInput {
            name,
            phone: self.fields[field::PHONE].value.trim().to_string(),
            email: self.fields[field::EMAIL].value.trim().to_string(),
            age: whole(field::AGE)?,
            sex: self.level(field::SEX)?,
            chest_pain: self.level(field::CHEST_PAIN)?,
            resting_bp: whole(field::RESTING_BP)?,
            cholesterol: whole(field::CHOLESTEROL)?,
            fasting_bs: u8::from(self.fields[field::FASTING_BS].selected_code() == Some("1")),
            resting_ecg: self.level(field::RESTING_ECG)?,
            max_hr: whole(field::MAX_HR)?,
            exercise_angina: self.level(field::EXERCISE_ANGINA)?,
            oldpeak: self.fields[field::OLDPEAK].parse_number()?,
            st_slope: self.level(field::ST_SLOPE)?,
        })
    }

    fn level<T: Categorical>(&self, index: usize) -> Result<T, String> {
        let field = &self.fields[index];
        field
            .selected_code()
            .and_then(T::from_code)
            .ok_or_else(|| format!("{}: Invalid selection", field.label))
    }

    /// Load sample data for testing (high-risk profile)
    pub fn load_sample_data(&mut self) {
        let sample = PatientInput {
            name: "Sample Patient".to_string(),
            phone: "555-0142".to_string(),
            email: "sample@example.com".to_string(),
            age: 58,
            sex: Sex::Male,
            chest_pain: ChestPainType::Asy,
            resting_bp: 140,
            cholesterol: 289,
            fasting_bs: 1,
            resting_ecg: RestingEcg::St,
            max_hr: 110,
            exercise_angina: ExerciseAngina::Yes,
            oldpeak: 2.5,
            st_slope: StSlope::Flat,
        };
        self.load(&sample);
    }

    /// Fill every field from an existing input.
    pub fn load(&mut self, patient: &PatientInput) {
        self.fields[field::NAME].value = patient.name.clone();
        self.fields[field::PHONE].value = patient.phone.clone();
        self.fields[field::EMAIL].value = patient.email.clone();
        self.fields[field::AGE].value = patient.age.to_string();
        self.fields[field::RESTING_BP].value = patient.resting_bp.to_string();
        self.fields[field::CHOLESTEROL].value = patient.cholesterol.to_string();
        self.fields[field::MAX_HR].value = patient.max_hr.to_string();
        self.fields[field::OLDPEAK].value = format!("{:.1}", patient.oldpeak);
        self.select(field::SEX, patient.sex.index());
        self.select(field::CHEST_PAIN, patient.chest_pain.index());
        self.select(field::FASTING_BS, usize::from(patient.fasting_bs.min(1)));
        self.select(field::RESTING_ECG, patient.resting_ecg.index());
        self.select(field::EXERCISE_ANGINA, patient.exercise_angina.index());
        self.select(field::ST_SLOPE, patient.st_slope.index());
        self.error_message = None;
    }

    fn select(&mut self, index: usize, value: usize) {
        if let FieldKind::Choice { selected, .. } = &mut self.fields[index].kind {
            *selected = value;
        }
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("AI Heart Disease Clinical Analyzer", ClinicTheme::title()),
        Span::styled(
            " │ Provide the following details to check your heart risk",
            ClinicTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    // Left: identity and numeric fields. Right: selectors.
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = field::SEX;
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (ClinicTheme::border_focused(), ClinicTheme::focused())
        } else {
            (ClinicTheme::border(), ClinicTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let display = field.display();
        let value = if display.is_empty() {
            Span::styled(field.hint, ClinicTheme::text_muted())
        } else {
            Span::styled(display, ClinicTheme::text())
        };

        let cursor = if is_selected && !matches!(field.kind, FieldKind::Choice { .. }) {
            Span::styled("▌", ClinicTheme::cursor())
        } else {
            Span::raw("")
        };

        let content = Paragraph::new(Line::from(vec![Span::raw(" "), value, cursor])).block(block);
        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(err.clone(), ClinicTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Navigate ", ClinicTheme::key_desc()),
            Span::styled("[◀▶] ", ClinicTheme::key_hint()),
            Span::styled("Change ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Analyze Heart Risk ", ClinicTheme::key_desc()),
            Span::styled("[F2] ", ClinicTheme::key_hint()),
            Span::styled("Sample Data ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
