//! Top-level orchestration: fetch a dataset snapshot, build features, score
//! every domain, and report timing.

use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScorerConfig;
use crate::dataset::{fetch_patient_dataset, DatasetError, PatientDataSource, PatientDataset};
use crate::domains::{compute_domain_results, DomainResult};
use crate::features::LongitudinalFeatures;

/// Complete output of one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub features: LongitudinalFeatures,
    pub domains: Vec<DomainResult>,
    pub processing_time_ms: u64,
}

/// The risk engine: stateless apart from its configuration. Concurrent
/// assessments for different patients (or repeated ones for the same
/// patient) are fully independent.
pub struct RiskEngine {
    config: ScorerConfig,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

impl RiskEngine {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Pure scoring path: dataset snapshot in, assessment out. No suspension
    /// points, no shared state, no retries.
    pub fn assess(&self, dataset: &PatientDataset, now: NaiveDateTime) -> RiskAssessment {
        let start = Instant::now();

        let computation = compute_domain_results(dataset, &self.config, now);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            patient_id = %dataset.patient.id,
            domains = computation.domains.len(),
            metrics = computation.features.metrics.len(),
            processing_ms = processing_time_ms,
            "Risk assessment complete"
        );

        RiskAssessment {
            features: computation.features,
            domains: computation.domains,
            processing_time_ms,
        }
    }

    /// Fetch the dataset through the external collaborator, then score it.
    /// Callers wanting a timeout should wrap the fetch, not the scoring.
    pub async fn assess_patient<S: PatientDataSource>(
        &self,
        source: &S,
        patient_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<RiskAssessment, DatasetError> {
        let dataset = fetch_patient_dataset(source, patient_id).await?;
        Ok(self.assess(&dataset, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::RiskLabel;
    use crate::models::{LabRow, Patient, VitalRow};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn dataset() -> PatientDataset {
        PatientDataset::empty(Patient { id: Uuid::new_v4(), birth_date: None, sex: None })
    }

    /// The key regression scenario: one high-risk metric present, one
    /// critical metric missing. A single LDL of 7.0 mmol/L (≈270.7 mg/dL)
    /// lands in the top band, but cardiovascular still resolves to Unknown
    /// because no systolic pressure was ever recorded.
    #[test]
    fn high_ldl_with_missing_sbp_resolves_unknown() {
        let mut data = dataset();
        data.labs = vec![LabRow {
            test_code: Some("LDL".into()),
            value: Some(7.0),
            unit: Some("MMOL/L".into()),
            taken_at: Some(now() - Duration::days(10)),
            ..Default::default()
        }];

        let assessment = RiskEngine::default().assess(&data, now());

        let ldl = assessment.features.metric(crate::metrics::MetricKey::Ldl).unwrap();
        let latest = ldl.latest.as_ref().unwrap();
        assert!((latest.value - 270.69).abs() < 0.01);

        let cardio =
            assessment.domains.iter().find(|d| d.condition == "cardiovascular").unwrap();
        assert_eq!(cardio.risk_label, RiskLabel::Unknown);
        assert_eq!(cardio.risk_score, 0.0);
        assert!(cardio.top_factors[0].detail.contains("Systolic BP"));
    }

    #[test]
    fn assessment_covers_all_three_domains() {
        let assessment = RiskEngine::default().assess(&dataset(), now());

        let conditions: Vec<&str> =
            assessment.domains.iter().map(|d| d.condition.as_str()).collect();
        assert_eq!(conditions, vec!["cardiovascular", "metabolic", "renal"]);
        // Empty record: everything degrades to Unknown, never an error.
        assert!(assessment.domains.iter().all(|d| d.risk_label == RiskLabel::Unknown));
    }

    #[test]
    fn results_carry_the_configured_model_tag() {
        let config = ScorerConfig {
            model_version: "longitudinal-risk@test".into(),
            ..Default::default()
        };
        let assessment = RiskEngine::new(config).assess(&dataset(), now());
        assert!(assessment.domains.iter().all(|d| d.model == "longitudinal-risk@test"));
    }

    /// Exercises the tracing call sites with a real subscriber installed,
    /// the way the binary embedding this library would run.
    #[test]
    fn assessment_completes_with_logging_enabled() {
        use tracing_subscriber::EnvFilter;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("longitudinal_risk=debug"))
            .with_test_writer()
            .try_init()
            .ok();

        let mut data = dataset();
        data.vitals = vec![VitalRow {
            sbp: Some(140.0),
            taken_at: Some(now() - Duration::days(2)),
            ..Default::default()
        }];

        let assessment = RiskEngine::default().assess(&data, now());
        assert_eq!(assessment.domains.len(), 3);
    }

    #[test]
    fn repeated_assessment_is_deterministic() {
        let mut data = dataset();
        data.vitals = vec![VitalRow {
            sbp: Some(150.0),
            taken_at: Some(now() - Duration::days(3)),
            ..Default::default()
        }];

        let engine = RiskEngine::default();
        let a = engine.assess(&data, now());
        let b = engine.assess(&data, now());

        for (left, right) in a.domains.iter().zip(&b.domains) {
            assert_eq!(left.risk_score, right.risk_score);
            assert_eq!(left.risk_label, right.risk_label);
        }
    }
}
