//! Metabolic domain: HbA1c (level and trend), fasting glucose, and BMI.

use chrono::NaiveDateTime;
use serde_json::json;

use crate::config::ScorerConfig;
use crate::features::LongitudinalFeatures;
use crate::metrics::MetricKey;

use super::{
    finalize_domain, mean_contribution, slope_contribution, stale_critical_metrics,
    AscendingBands, DomainResult,
};

pub const CONDITION: &str = "metabolic";

const CRITICAL: &[MetricKey] = &[MetricKey::Hba1c];

const HBA1C_BANDS: AscendingBands =
    AscendingBands(&[(5.7, 0.0), (6.4, 0.4), (8.0, 0.7), (f64::INFINITY, 1.0)]);

const GLUCOSE_BANDS: AscendingBands =
    AscendingBands(&[(100.0, 0.0), (125.0, 0.4), (180.0, 0.7), (f64::INFINITY, 1.0)]);

const BMI_BANDS: AscendingBands =
    AscendingBands(&[(25.0, 0.0), (30.0, 0.4), (35.0, 0.7), (f64::INFINITY, 1.0)]);

/// HbA1c drifts slowly; even a few thousandths of a point per day sustained
/// over a year is a full point of A1c.
const HBA1C_SLOPE_BANDS: AscendingBands =
    AscendingBands(&[(0.0, 0.0), (0.002, 0.3), (0.01, 0.7), (f64::INFINITY, 0.9)]);

pub fn score(
    features: &LongitudinalFeatures,
    config: &ScorerConfig,
    now: NaiveDateTime,
) -> DomainResult {
    let contributions: Vec<_> = [
        mean_contribution(features, MetricKey::Hba1c, &[90, 365], &HBA1C_BANDS, "hba1c_mean", 0.45),
        mean_contribution(
            features,
            MetricKey::Glucose,
            &[90, 365],
            &GLUCOSE_BANDS,
            "glucose_mean",
            0.25,
        ),
        mean_contribution(features, MetricKey::Bmi, &[90, 365], &BMI_BANDS, "bmi_mean", 0.2),
        slope_contribution(features, MetricKey::Hba1c, 365, &HBA1C_SLOPE_BANDS, "hba1c_trend", 0.1),
    ]
    .into_iter()
    .flatten()
    .collect();

    let snapshot = json!({
        "hba1c_mean": features.mean_preferring(MetricKey::Hba1c, &[90, 365]).map(|(v, _)| v),
        "glucose_mean": features.mean_preferring(MetricKey::Glucose, &[90, 365]).map(|(v, _)| v),
        "bmi_mean": features.mean_preferring(MetricKey::Bmi, &[90, 365]).map(|(v, _)| v),
        "hba1c_slope_365d": features.slope_per_day(MetricKey::Hba1c, 365),
    });

    let stale = stale_critical_metrics(features, CRITICAL, now, config.stale_after_days);

    finalize_domain(CONDITION, contributions, stale, snapshot, config, now)
}
