//! Patient input types for heart-disease risk prediction.
//!
//! Field set and categorical levels follow the UCI heart failure prediction
//! dataset the classifier is fitted on.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::features::EnteredFeatures;

/// Age in years accepted by the form.
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
/// Resting blood pressure in mm Hg.
pub const RESTING_BP_RANGE: RangeInclusive<u32> = 80..=200;
/// Serum cholesterol in mg/dL.
pub const CHOLESTEROL_RANGE: RangeInclusive<u32> = 100..=600;
/// Maximum heart rate achieved.
pub const MAX_HR_RANGE: RangeInclusive<u32> = 60..=220;
/// ST depression induced by exercise relative to rest.
pub const OLDPEAK_RANGE: RangeInclusive<f64> = 0.0..=6.0;

/// A categorical field with a fixed set of levels.
///
/// `PREFIX` and `code()` together name the one-hot column (`{PREFIX}_{code}`).
pub trait Categorical: Sized + Copy + 'static {
    const PREFIX: &'static str;
    const ALL: &'static [Self];

    fn code(&self) -> &'static str;

    /// Parse a level from its dataset code.
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.code() == code)
    }

    /// Position of this level in `ALL`.
    fn index(&self) -> usize {
        let code = self.code();
        Self::ALL
            .iter()
            .position(|level| level.code() == code)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Categorical for Sex {
    const PREFIX: &'static str = "Sex";
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChestPainType {
    /// Atypical angina
    #[default]
    #[serde(rename = "ATA")]
    Ata,
    /// Non-anginal pain
    #[serde(rename = "NAP")]
    Nap,
    /// Typical angina
    #[serde(rename = "TA")]
    Ta,
    /// Asymptomatic
    #[serde(rename = "ASY")]
    Asy,
}

impl Categorical for ChestPainType {
    const PREFIX: &'static str = "ChestPainType";
    const ALL: &'static [Self] = &[Self::Ata, Self::Nap, Self::Ta, Self::Asy];

    fn code(&self) -> &'static str {
        match self {
            Self::Ata => "ATA",
            Self::Nap => "NAP",
            Self::Ta => "TA",
            Self::Asy => "ASY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestingEcg {
    #[default]
    Normal,
    /// ST-T wave abnormality
    #[serde(rename = "ST")]
    St,
    /// Left ventricular hypertrophy
    #[serde(rename = "LVH")]
    Lvh,
}

impl Categorical for RestingEcg {
    const PREFIX: &'static str = "RestingECG";
    const ALL: &'static [Self] = &[Self::Normal, Self::St, Self::Lvh];

    fn code(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::St => "ST",
            Self::Lvh => "LVH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExerciseAngina {
    #[default]
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl Categorical for ExerciseAngina {
    const PREFIX: &'static str = "ExerciseAngina";
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn code(&self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StSlope {
    #[default]
    Up,
    Flat,
    Down,
}

impl Categorical for StSlope {
    const PREFIX: &'static str = "ST_Slope";
    const ALL: &'static [Self] = &[Self::Up, Self::Flat, Self::Down];

    fn code(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Flat => "Flat",
            Self::Down => "Down",
        }
    }
}

/// One form submission: identity fields plus clinical parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,

    /// Age in years
    pub age: u32,
    pub sex: Sex,
    pub chest_pain: ChestPainType,
    /// Resting blood pressure (mm Hg)
    pub resting_bp: u32,
    /// Serum cholesterol (mg/dL)
    pub cholesterol: u32,
    /// Fasting blood sugar > 120 mg/dL: 0 = no, 1 = yes
    pub fasting_bs: u8,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved
    pub max_hr: u32,
    pub exercise_angina: ExerciseAngina,
    /// ST depression
    pub oldpeak: f64,
    pub st_slope: StSlope,
}

impl Default for PatientInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            age: 40,
            sex: Sex::default(),
            chest_pain: ChestPainType::default(),
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: 0,
            resting_ecg: RestingEcg::default(),
            max_hr: 150,
            exercise_angina: ExerciseAngina::default(),
            oldpeak: 1.0,
            st_slope: StSlope::default(),
        }
    }
}

impl PatientInput {
    /// Sparse feature mapping: raw numeric columns plus one indicator per
    /// categorical field.
    #[must_use]
    pub fn entered_features(&self) -> EnteredFeatures {
        let mut features = EnteredFeatures::new();
        features.set("Age", f64::from(self.age));
        features.set("RestingBP", f64::from(self.resting_bp));
        features.set("Cholesterol", f64::from(self.cholesterol));
        features.set("FastingBS", f64::from(self.fasting_bs));
        features.set("MaxHR", f64::from(self.max_hr));
        features.set("Oldpeak", self.oldpeak);

        set_level(&mut features, self.sex);
        set_level(&mut features, self.chest_pain);
        set_level(&mut features, self.resting_ecg);
        set_level(&mut features, self.exercise_angina);
        set_level(&mut features, self.st_slope);
        features
    }

    /// Clinical parameters shown on the report, in display order.
    #[must_use]
    pub fn clinical_parameters(&self) -> Vec<(String, String)> {
        vec![
            ("Age".to_string(), self.age.to_string()),
            ("BP".to_string(), self.resting_bp.to_string()),
            ("Cholesterol".to_string(), self.cholesterol.to_string()),
            ("MaxHR".to_string(), self.max_hr.to_string()),
            ("Oldpeak".to_string(), format_oldpeak(self.oldpeak)),
        ]
    }

    /// Validate that numeric fields are within the form bounds.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !AGE_RANGE.contains(&self.age) {
            errors.push(format!("Age {} out of range [18, 100]", self.age));
        }
        if !RESTING_BP_RANGE.contains(&self.resting_bp) {
            errors.push(format!(
                "Resting BP {} out of range [80, 200]",
                self.resting_bp
            ));
        }
        if !CHOLESTEROL_RANGE.contains(&self.cholesterol) {
            errors.push(format!(
                "Cholesterol {} out of range [100, 600]",
                self.cholesterol
            ));
        }
        if self.fasting_bs > 1 {
            errors.push(format!("Fasting BS {} must be 0 or 1", self.fasting_bs));
        }
        if !MAX_HR_RANGE.contains(&self.max_hr) {
            errors.push(format!("Max HR {} out of range [60, 220]", self.max_hr));
        }
        if !OLDPEAK_RANGE.contains(&self.oldpeak) {
            errors.push(format!("Oldpeak {} out of range [0, 6]", self.oldpeak));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn set_level<T: Categorical>(features: &mut EnteredFeatures, level: T) {
    features.set_one_hot(T::PREFIX, level.code());
}

/// Oldpeak as entered; whole numbers keep one decimal place.
fn format_oldpeak(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureSchema;

    const FULL_SCHEMA: [&str; 20] = [
        "Age",
        "RestingBP",
        "Cholesterol",
        "FastingBS",
        "MaxHR",
        "Oldpeak",
        "Sex_F",
        "Sex_M",
        "ChestPainType_ASY",
        "ChestPainType_ATA",
        "ChestPainType_NAP",
        "ChestPainType_TA",
        "RestingECG_LVH",
        "RestingECG_Normal",
        "RestingECG_ST",
        "ExerciseAngina_N",
        "ExerciseAngina_Y",
        "ST_Slope_Down",
        "ST_Slope_Flat",
        "ST_Slope_Up",
    ];

    fn scenario() -> PatientInput {
        PatientInput {
            age: 40,
            sex: Sex::Male,
            chest_pain: ChestPainType::Ata,
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: 0,
            resting_ecg: RestingEcg::Normal,
            max_hr: 150,
            exercise_angina: ExerciseAngina::No,
            oldpeak: 1.0,
            st_slope: StSlope::Up,
            ..Default::default()
        }
    }

    #[test]
    fn test_entered_features_use_prefix_value_columns() {
        let features = scenario().entered_features();

        assert_eq!(features.len(), 11);
        assert_eq!(features.get("Sex_M"), Some(1.0));
        assert_eq!(features.get("ChestPainType_ATA"), Some(1.0));
        assert_eq!(features.get("RestingECG_Normal"), Some(1.0));
        assert_eq!(features.get("ExerciseAngina_N"), Some(1.0));
        assert_eq!(features.get("ST_Slope_Up"), Some(1.0));
        assert_eq!(features.get("Sex_F"), None);
    }

    #[test]
    fn test_scenario_aligns_to_full_schema() {
        let schema =
            FeatureSchema::new(FULL_SCHEMA.iter().map(|c| (*c).to_string()).collect()).unwrap();

        let vector = schema.align(&scenario().entered_features());

        let expected_nonzero = [
            ("Age", 40.0),
            ("RestingBP", 120.0),
            ("Cholesterol", 200.0),
            ("MaxHR", 150.0),
            ("Oldpeak", 1.0),
            ("Sex_M", 1.0),
            ("ChestPainType_ATA", 1.0),
            ("RestingECG_Normal", 1.0),
            ("ExerciseAngina_N", 1.0),
            ("ST_Slope_Up", 1.0),
        ];
        assert_eq!(vector.len(), FULL_SCHEMA.len());
        for (column, value) in vector.iter() {
            let expected = expected_nonzero
                .iter()
                .find(|(c, _)| *c == column)
                .map_or(0.0, |(_, v)| *v);
            assert!(
                (value - expected).abs() < f64::EPSILON,
                "{column}: got {value}, expected {expected}"
            );
        }
        assert_eq!(vector.get("FastingBS"), Some(0.0));
        assert!(schema.dropped_columns(&scenario().entered_features()).is_empty());
    }

    #[test]
    fn test_categorical_codes_roundtrip() {
        assert_eq!(ChestPainType::from_code("ASY"), Some(ChestPainType::Asy));
        assert_eq!(RestingEcg::from_code("lvh"), None);
        assert_eq!(StSlope::Flat.index(), 1);
        let json = serde_json::to_string(&ExerciseAngina::No).unwrap();
        assert_eq!(json, "\"N\"");
    }

    #[test]
    fn test_clinical_parameters_order_and_format() {
        let params = scenario().clinical_parameters();
        let labels: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(labels, ["Age", "BP", "Cholesterol", "MaxHR", "Oldpeak"]);
        assert_eq!(params[4].1, "1.0");
    }

    #[test]
    fn test_report_oldpeak_matches_scored_value() {
        let patient = PatientInput {
            oldpeak: 1.25,
            ..Default::default()
        };
        assert!(patient.validate().is_ok());

        let scored = patient.entered_features().get("Oldpeak").unwrap();
        let printed: f64 = patient.clinical_parameters()[4].1.parse().unwrap();
        assert_eq!(printed, scored);
        assert_eq!(patient.clinical_parameters()[4].1, "1.25");
    }

    #[test]
    fn test_validation() {
        assert!(PatientInput::default().validate().is_ok());

        let invalid = PatientInput {
            age: 10,
            fasting_bs: 2,
            oldpeak: 7.5,
            ..Default::default()
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_deserialize_from_codes() {
        let json = r#"{
            "name": "Ada", "age": 58, "sex": "F", "chest_pain": "NAP",
            "resting_bp": 130, "cholesterol": 240, "fasting_bs": 1,
            "resting_ecg": "LVH", "max_hr": 140, "exercise_angina": "N",
            "oldpeak": 0.5, "st_slope": "Flat"
        }"#;
        let patient: PatientInput = serde_json::from_str(json).unwrap();
        assert_eq!(patient.sex, Sex::Female);
        assert_eq!(patient.resting_ecg, RestingEcg::Lvh);
        assert!(patient.phone.is_empty());
    }
}
