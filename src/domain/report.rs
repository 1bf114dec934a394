//! Medical report content and fixed page layout.
//!
//! Layout coordinates are PDF points on an A4 page with the origin at the
//! bottom-left corner. Rendering the positioned lines is left to a
//! `ReportRenderer`.

use chrono::NaiveDate;
use serde::Serialize;

use super::patient::PatientInput;
use super::risk::{RiskAssessment, RiskLevel};

pub const REPORT_TITLE: &str = "AI Heart Disease Medical Report";

/// A4 page size.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const TITLE_X: f32 = 160.0;
const TITLE_Y: f32 = 800.0;
const MARGIN_X: f32 = 50.0;
const INDENT_X: f32 = 60.0;
const LINE_STEP: f32 = 20.0;
const SECTION_GAP: f32 = 40.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
}

/// Everything printed on the one-page report.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalReport {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: NaiveDate,
    pub parameters: Vec<(String, String)>,
    pub risk_percent: u8,
    pub level: RiskLevel,
    pub advice: String,
}

impl MedicalReport {
    #[must_use]
    pub fn new(patient: &PatientInput, assessment: &RiskAssessment, date: NaiveDate) -> Self {
        Self {
            name: patient.name.clone(),
            phone: patient.phone.clone(),
            email: patient.email.clone(),
            date,
            parameters: patient.clinical_parameters(),
            risk_percent: assessment.risk_percent,
            level: assessment.level,
            advice: assessment.advice.clone(),
        }
    }

    /// Fixed vertical placement of every line on the page.
    ///
    /// No pagination: content is expected to fit one page.
    #[must_use]
    pub fn layout(&self) -> Vec<TextLine> {
        let mut lines = Vec::new();
        let mut y = TITLE_Y;

        lines.push(line(REPORT_TITLE, TITLE_X, y, TITLE_SIZE, FontWeight::Bold));

        y -= SECTION_GAP;
        let identity = [
            format!("Name: {}", self.name),
            format!("Phone: {}", self.phone),
            format!("Email: {}", self.email),
            format!("Date: {}", self.date.format("%d %B %Y")),
        ];
        for (i, text) in identity.into_iter().enumerate() {
            if i > 0 {
                y -= LINE_STEP;
            }
            lines.push(line(text, MARGIN_X, y, BODY_SIZE, FontWeight::Regular));
        }

        y -= SECTION_GAP;
        lines.push(line(
            "Clinical Parameters",
            MARGIN_X,
            y,
            HEADING_SIZE,
            FontWeight::Bold,
        ));
        for (label, value) in &self.parameters {
            y -= LINE_STEP;
            lines.push(line(
                format!("{label}: {value}"),
                INDENT_X,
                y,
                BODY_SIZE,
                FontWeight::Regular,
            ));
        }

        y -= SECTION_GAP;
        lines.push(line(
            format!("Risk Result: {}% ({})", self.risk_percent, self.level),
            MARGIN_X,
            y,
            HEADING_SIZE,
            FontWeight::Bold,
        ));

        y -= SECTION_GAP;
        lines.push(line(
            "Recommendation",
            MARGIN_X,
            y,
            HEADING_SIZE,
            FontWeight::Bold,
        ));
        for advice in self.advice.split('\n') {
            y -= LINE_STEP;
            lines.push(line(advice, INDENT_X, y, BODY_SIZE, FontWeight::Regular));
        }

        lines
    }
}

fn line(text: impl Into<String>, x: f32, y: f32, size: f32, weight: FontWeight) -> TextLine {
    TextLine {
        text: text.into(),
        x,
        y,
        size,
        weight,
    }
}

/// A rendered report ready to hand to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Download name for a patient's report: `{name}_Heart_Report.pdf`.
///
/// Characters that cannot appear in a single path component are replaced
/// with `_`; a blank name becomes `Patient`.
#[must_use]
pub fn report_file_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem: String = if trimmed.is_empty() {
        "Patient".to_string()
    } else {
        trimmed
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    let stem = if stem.chars().all(|c| c == '.') {
        "Patient".to_string()
    } else {
        stem
    };
    format!("{stem}_Heart_Report.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(date: NaiveDate) -> MedicalReport {
        let patient = PatientInput {
            name: "Ada Lovelace".into(),
            phone: "555-0100".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        };
        let assessment = RiskAssessment::from_probability(0.45);
        MedicalReport::new(&patient, &assessment, date)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_layout_fixed_positions() {
        let lines = report(date(2026, 3, 7)).layout();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(
            texts,
            [
                "AI Heart Disease Medical Report",
                "Name: Ada Lovelace",
                "Phone: 555-0100",
                "Email: ada@example.com",
                "Date: 07 March 2026",
                "Clinical Parameters",
                "Age: 40",
                "BP: 120",
                "Cholesterol: 200",
                "MaxHR: 150",
                "Oldpeak: 1.0",
                "Risk Result: 45% (Moderate Risk)",
                "Recommendation",
                "Reduce cholesterol",
                "Start cardio exercise",
                "Consult physician",
            ]
        );

        let ys: Vec<f32> = lines.iter().map(|l| l.y).collect();
        assert_eq!(
            ys,
            [
                800.0, 760.0, 740.0, 720.0, 700.0, 660.0, 640.0, 620.0, 600.0, 580.0, 560.0,
                520.0, 480.0, 460.0, 440.0, 420.0,
            ]
        );
        assert_eq!(lines[0].x, 160.0);
        assert_eq!(lines[0].weight, FontWeight::Bold);
        assert_eq!(lines[6].x, 60.0);
        assert_eq!(lines[11].size, 14.0);
    }

    #[test]
    fn test_layout_is_idempotent_except_date() {
        let a = report(date(2026, 1, 2)).layout();
        let b = report(date(2026, 1, 2)).layout();
        assert_eq!(a, b);

        let c = report(date(2027, 5, 9)).layout();
        let differing: Vec<usize> = (0..a.len()).filter(|&i| a[i] != c[i]).collect();
        assert_eq!(differing, [4]);
        assert!(c[4].text.starts_with("Date: "));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Ada"), "Ada_Heart_Report.pdf");
        assert_eq!(report_file_name("Ada Lovelace"), "Ada Lovelace_Heart_Report.pdf");
        assert_eq!(report_file_name("../etc/x"), ".._etc_x_Heart_Report.pdf");
        assert_eq!(report_file_name("  "), "Patient_Heart_Report.pdf");
        assert_eq!(report_file_name(".."), "Patient_Heart_Report.pdf");
    }
}
