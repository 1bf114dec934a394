//! Risk tiering.
//!
//! Maps the classifier's positive-class probability to an integer percentage
//! and one of three ordered bands, each with fixed recommendations.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the moderate band, in percent.
const MODERATE_THRESHOLD: u8 = 30;
/// Lower bound (inclusive) of the high band, in percent.
const HIGH_THRESHOLD: u8 = 60;

/// Absorbs binary floating-point error so that e.g. 0.29 maps to 29, not 28.
const PERCENT_EPSILON: f64 = 1e-9;

/// Risk tier for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// risk < 30
    Low,
    /// 30 <= risk < 60
    Moderate,
    /// risk >= 60
    High,
}

impl RiskLevel {
    /// Band for an integer risk percentage.
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        if percent < MODERATE_THRESHOLD {
            Self::Low
        } else if percent < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    /// Recommendation lines, newline-separated.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Low => "Maintain healthy diet\nExercise regularly\nAnnual checkup",
            Self::Moderate => "Reduce cholesterol\nStart cardio exercise\nConsult physician",
            Self::High => "Immediate cardiologist visit\nECG & Echo test\nMedication required",
        }
    }

    /// One-line status addressed to the patient.
    #[must_use]
    pub fn status_message(&self, name: &str) -> String {
        match self {
            Self::Low => format!("Low Risk — {name}'s heart condition appears stable."),
            Self::Moderate => {
                format!("Moderate Risk — Preventive consultation recommended for {name}.")
            }
            Self::High => {
                format!("High Risk — Immediate cardiologist consultation advised for {name}.")
            }
        }
    }

    /// Display colour (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),      // Emerald (#10B981)
            Self::Moderate => (251, 191, 36), // Amber (#FBBF24)
            Self::High => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Probability (0-1) as a truncated integer percentage, clamped to 0-100.
#[must_use]
pub fn risk_percent(probability: f64) -> u8 {
    if !probability.is_finite() {
        return 0;
    }
    let percent = (probability * 100.0 + PERCENT_EPSILON).floor();
    percent.clamp(0.0, 100.0) as u8
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Raw positive-class probability (0.0 to 1.0)
    pub probability: f64,
    /// Integer percentage (0 to 100)
    pub risk_percent: u8,
    pub level: RiskLevel,
    pub advice: String,
}

impl RiskAssessment {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        let risk_percent = risk_percent(probability);
        let level = RiskLevel::from_percent(risk_percent);
        Self {
            probability,
            risk_percent,
            level,
            advice: level.advice().to_string(),
        }
    }

    pub fn advice_lines(&self) -> impl Iterator<Item = &str> {
        self.advice.split('\n')
    }
}
