//! Renal domain: eGFR (lower is worse), creatinine (level and trend), and
//! systolic pressure as a secondary driver.

use chrono::NaiveDateTime;
use serde_json::json;

use crate::config::ScorerConfig;
use crate::features::LongitudinalFeatures;
use crate::metrics::MetricKey;

use super::{
    finalize_domain, mean_contribution, mean_contribution_descending, slope_contribution,
    stale_critical_metrics, AscendingBands, DescendingBands, DomainResult,
};

pub const CONDITION: &str = "renal";

const CRITICAL: &[MetricKey] = &[MetricKey::Creatinine];

/// CKD staging thresholds; below 30 mL/min/1.73m² is severe impairment.
const EGFR_BANDS: DescendingBands = DescendingBands(&[
    (90.0, 0.0),
    (60.0, 0.3),
    (45.0, 0.55),
    (30.0, 0.75),
    (f64::NEG_INFINITY, 1.0),
]);

const CREATININE_BANDS: AscendingBands =
    AscendingBands(&[(1.2, 0.0), (1.5, 0.3), (2.0, 0.6), (f64::INFINITY, 1.0)]);

const CREATININE_SLOPE_BANDS: AscendingBands =
    AscendingBands(&[(0.0, 0.0), (0.002, 0.3), (0.01, 0.7), (f64::INFINITY, 0.9)]);

const SBP_BANDS: AscendingBands =
    AscendingBands(&[(130.0, 0.0), (150.0, 0.4), (f64::INFINITY, 0.8)]);

pub fn score(
    features: &LongitudinalFeatures,
    config: &ScorerConfig,
    now: NaiveDateTime,
) -> DomainResult {
    let contributions: Vec<_> = [
        mean_contribution_descending(
            features,
            MetricKey::Egfr,
            &[90, 365],
            &EGFR_BANDS,
            "egfr_mean",
            0.5,
        ),
        mean_contribution(
            features,
            MetricKey::Creatinine,
            &[90, 365],
            &CREATININE_BANDS,
            "creatinine_mean",
            0.3,
        ),
        slope_contribution(
            features,
            MetricKey::Creatinine,
            365,
            &CREATININE_SLOPE_BANDS,
            "creatinine_trend",
            0.1,
        ),
        mean_contribution(features, MetricKey::Sbp, &[30, 90], &SBP_BANDS, "sbp_mean", 0.1),
    ]
    .into_iter()
    .flatten()
    .collect();

    let snapshot = json!({
        "egfr_mean": features.mean_preferring(MetricKey::Egfr, &[90, 365]).map(|(v, _)| v),
        "creatinine_mean":
            features.mean_preferring(MetricKey::Creatinine, &[90, 365]).map(|(v, _)| v),
        "creatinine_slope_365d": features.slope_per_day(MetricKey::Creatinine, 365),
        "sbp_mean": features.mean_preferring(MetricKey::Sbp, &[30, 90]).map(|(v, _)| v),
    });

    let stale = stale_critical_metrics(features, CRITICAL, now, config.stale_after_days);

    finalize_domain(CONDITION, contributions, stale, snapshot, config, now)
}
