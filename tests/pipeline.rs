//! End-to-end assessment over the bundled demonstration model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::tempdir;

use cardiolens::adapters::{load_bundle, save_report, LoadOptions, LoadedBundle, PdfReportRenderer};
use cardiolens::application::AssessmentService;
use cardiolens::domain::{
    ChestPainType, DropReason, ExerciseAngina, PatientInput, RestingEcg, RiskLevel, Sex, StSlope,
};

fn models_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
}

fn bundle() -> LoadedBundle {
    load_bundle(&models_dir(), LoadOptions::default()).expect("demo bundle loads and verifies")
}

fn service() -> AssessmentService<
    cardiolens::adapters::model::StandardScaler,
    cardiolens::adapters::model::ClassifierModel,
    PdfReportRenderer,
> {
    AssessmentService::new(Arc::new(bundle()), Arc::new(PdfReportRenderer::new()))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn demo_bundle_schema_is_drop_first() {
    let bundle = bundle();
    let schema = bundle.schema();
    assert_eq!(schema.len(), 15);

    let entered = PatientInput::default().entered_features();
    let dropped = schema.dropped_columns(&entered);
    // Default patient: ChestPainType_ATA, RestingECG_Normal, ExerciseAngina_Y,
    // Sex_M and ST_Slope_Up are all fitted columns.
    assert!(dropped.is_empty(), "{dropped:?}");

    let female = PatientInput {
        sex: Sex::Female,
        chest_pain: ChestPainType::Asy,
        ..Default::default()
    };
    let dropped = schema.dropped_columns(&female.entered_features());
    let names: Vec<&str> = dropped.iter().map(|d| d.column.as_str()).collect();
    assert_eq!(names, ["ChestPainType_ASY", "Sex_F"]);
    assert!(dropped.iter().all(|d| d.reason == DropReason::ReferenceLevel));
}

#[test]
fn default_patient_is_low_risk() {
    let patient = PatientInput {
        name: "Default".into(),
        ..Default::default()
    };
    let assessment = service().assess(&patient).unwrap();
    assert_eq!(assessment.risk_percent, 0);
    assert_eq!(assessment.level, RiskLevel::Low);
}

#[test]
fn moderate_profile() {
    let patient = PatientInput {
        name: "Moderate".into(),
        age: 50,
        sex: Sex::Female,
        chest_pain: ChestPainType::Ata,
        resting_bp: 130,
        cholesterol: 220,
        fasting_bs: 0,
        resting_ecg: RestingEcg::Normal,
        max_hr: 140,
        exercise_angina: ExerciseAngina::No,
        oldpeak: 1.0,
        st_slope: StSlope::Flat,
        ..Default::default()
    };
    let assessment = service().assess(&patient).unwrap();
    assert_eq!(assessment.risk_percent, 40);
    assert_eq!(assessment.level, RiskLevel::Moderate);
    assert_eq!(
        assessment.advice_lines().collect::<Vec<_>>(),
        ["Reduce cholesterol", "Start cardio exercise", "Consult physician"]
    );
}

#[test]
fn high_risk_submission_writes_pdf() {
    let patient = PatientInput {
        name: "Jordan Reyes".into(),
        phone: "555-0199".into(),
        email: "jordan@example.org".into(),
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
    assert!(patient.validate().is_ok());

    let submission = service().handle_submission(&patient, date()).unwrap();
    assert_eq!(submission.assessment.risk_percent, 100);
    assert_eq!(submission.assessment.level, RiskLevel::High);
    assert_eq!(submission.report.file_name, "Jordan Reyes_Heart_Report.pdf");
    assert!(submission.report.bytes.starts_with(b"%PDF"));

    let out = tempdir().expect("tempdir");
    let path = save_report(out.path(), &submission.report).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), submission.report.bytes);
}

#[test]
fn patient_json_roundtrip_through_service() {
    let json = r#"{
        "name": "Ada", "age": 40, "sex": "M", "chest_pain": "ATA",
        "resting_bp": 120, "cholesterol": 200, "fasting_bs": 0,
        "resting_ecg": "Normal", "max_hr": 150, "exercise_angina": "N",
        "oldpeak": 1.0, "st_slope": "Up"
    }"#;
    let patient: PatientInput = serde_json::from_str(json).unwrap();
    let assessment = service().assess(&patient).unwrap();
    assert_eq!(assessment.level, RiskLevel::Low);

    let value = serde_json::to_value(&assessment).unwrap();
    assert_eq!(value["level"], "Low");
    assert_eq!(value["risk_percent"], 0);
}
