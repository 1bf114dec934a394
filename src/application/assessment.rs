//! Assessment service: handles one form submission end to end.
//!
//! Pipeline per submission:
//! 1. Encode entered vitals into feature columns
//! 2. Align them to the fitted schema
//! 3. Scale and score
//! 4. Tier the probability
//! 5. Compose and render the report

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    report_file_name, DropReason, GeneratedReport, MedicalReport, PatientInput, RiskAssessment,
};
use crate::ports::{FeatureScaler, ReportRenderer, RiskClassifier};
use crate::CardiolensError;

use super::ModelBundle;

/// Result of a single submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub assessment: RiskAssessment,
    pub report: GeneratedReport,
}

/// Stateless request/response handler over a loaded model bundle.
pub struct AssessmentService<S, C, R>
where
    S: FeatureScaler,
    C: RiskClassifier,
    R: ReportRenderer,
{
    bundle: Arc<ModelBundle<S, C>>,
    renderer: Arc<R>,
}

impl<S, C, R> AssessmentService<S, C, R>
where
    S: FeatureScaler,
    C: RiskClassifier,
    R: ReportRenderer,
{
    pub fn new(bundle: Arc<ModelBundle<S, C>>, renderer: Arc<R>) -> Self {
        Self { bundle, renderer }
    }

    #[must_use]
    pub fn bundle(&self) -> &ModelBundle<S, C> {
        &self.bundle
    }

    /// Score a patient.
    ///
    /// # Errors
    /// Returns an error only if the bundle's scaler or classifier rejects the
    /// aligned vector, which a validated bundle never does.
    pub fn assess(&self, patient: &PatientInput) -> Result<RiskAssessment, CardiolensError> {
        let entered = patient.entered_features();
        let schema = self.bundle.schema();

        for dropped in schema.dropped_columns(&entered) {
            match dropped.reason {
                DropReason::ReferenceLevel => {
                    tracing::debug!("Column {} is a reference level, dropped", dropped.column);
                }
                DropReason::UnknownFeature => {
                    tracing::warn!("Column {} is not in the model schema, dropped", dropped.column);
                }
            }
        }

        let aligned = schema.align(&entered);
        tracing::debug!("Aligned {} entered columns to {} features", entered.len(), aligned.len());

        let scaled = self.bundle.scaler().transform(&aligned)?;
        let probability = self.bundle.classifier().predict_proba(&scaled)?;
        let assessment = RiskAssessment::from_probability(probability);

        tracing::info!(
            "Assessment complete: risk={}%, level={}",
            assessment.risk_percent,
            assessment.level
        );

        Ok(assessment)
    }

    /// Render the report for an assessment dated `date`.
    ///
    /// # Errors
    /// Returns `CardiolensError::Report` if rendering fails.
    pub fn compose_report(
        &self,
        patient: &PatientInput,
        assessment: &RiskAssessment,
        date: NaiveDate,
    ) -> Result<GeneratedReport, CardiolensError> {
        let report = MedicalReport::new(patient, assessment, date);
        let bytes = self.renderer.render(&report)?;
        tracing::debug!("Rendered report ({} bytes)", bytes.len());

        Ok(GeneratedReport {
            file_name: report_file_name(&patient.name),
            bytes,
        })
    }

    /// Assess a patient and render the report in one pass.
    ///
    /// # Errors
    /// See [`Self::assess`] and [`Self::compose_report`].
    pub fn handle_submission(
        &self,
        patient: &PatientInput,
        date: NaiveDate,
    ) -> Result<Submission, CardiolensError> {
        let assessment = self.assess(patient)?;
        let report = self.compose_report(patient, &assessment, date)?;
        Ok(Submission { assessment, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FeatureSchema, FeatureVector, ModelError, ReportError, RiskLevel, Sex,
    };
    use std::sync::Mutex;

    /// Passes the aligned vector through unchanged.
    struct Identity(usize);

    impl FeatureScaler for Identity {
        fn n_features(&self) -> usize {
            self.0
        }

        fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
            Ok(features.values().to_vec())
        }
    }

    /// Returns a fixed probability and records the last input.
    struct Fixed {
        n: usize,
        probability: f64,
        seen: Mutex<Vec<f64>>,
    }

    impl RiskClassifier for Fixed {
        fn n_features(&self) -> usize {
            self.n
        }

        fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
            *self.seen.lock().unwrap() = scaled.to_vec();
            Ok(self.probability)
        }
    }

    struct PlainText;

    impl ReportRenderer for PlainText {
        fn render(&self, report: &MedicalReport) -> Result<Vec<u8>, ReportError> {
            let text: Vec<String> = report.layout().into_iter().map(|l| l.text).collect();
            Ok(text.join("\n").into_bytes())
        }
    }

    fn service(probability: f64) -> AssessmentService<Identity, Fixed, PlainText> {
        let columns: Vec<String> = ["Age", "Cholesterol", "Sex_M", "ST_Slope_Flat", "ST_Slope_Up"]
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        let n = columns.len();
        let schema = FeatureSchema::new(columns).unwrap();
        let classifier = Fixed {
            n,
            probability,
            seen: Mutex::new(Vec::new()),
        };
        let bundle = ModelBundle::new(schema, Identity(n), classifier).unwrap();
        AssessmentService::new(Arc::new(bundle), Arc::new(PlainText))
    }

    fn patient() -> PatientInput {
        PatientInput {
            name: "Grace".into(),
            age: 61,
            cholesterol: 250,
            sex: Sex::Female,
            ..Default::default()
        }
    }

    #[test]
    fn test_assess_feeds_aligned_vector() {
        let service = service(0.5);
        service.assess(&patient()).unwrap();

        // Sex_F is the reference level and the unknown columns are dropped.
        let seen = service.bundle().classifier().seen.lock().unwrap().clone();
        assert_eq!(seen, [61.0, 250.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_assess_tier_boundaries() {
        let cases = [
            (0.29, 29, RiskLevel::Low),
            (0.30, 30, RiskLevel::Moderate),
            (0.59, 59, RiskLevel::Moderate),
            (0.60, 60, RiskLevel::High),
        ];
        for (probability, percent, level) in cases {
            let assessment = service(probability).assess(&patient()).unwrap();
            assert_eq!(assessment.risk_percent, percent, "p={probability}");
            assert_eq!(assessment.level, level, "p={probability}");
        }
    }

    #[test]
    fn test_handle_submission_composes_report() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let submission = service(0.8).handle_submission(&patient(), date).unwrap();

        assert_eq!(submission.assessment.level, RiskLevel::High);
        assert_eq!(submission.report.file_name, "Grace_Heart_Report.pdf");

        let text = String::from_utf8(submission.report.bytes).unwrap();
        assert!(text.contains("Name: Grace"));
        assert!(text.contains("Date: 19 October 2026"));
        assert!(text.contains("Risk Result: 80% (High Risk)"));
        assert!(text.contains("Immediate cardiologist visit"));
    }

    #[test]
    fn test_submissions_are_independent() {
        let service = service(0.1);
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let a = service.handle_submission(&patient(), date).unwrap();
        let b = service.handle_submission(&patient(), date).unwrap();
        assert_eq!(a.assessment, b.assessment);
        assert_eq!(a.report.bytes, b.report.bytes);
    }
}
