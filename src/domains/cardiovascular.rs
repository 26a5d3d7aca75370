//! Cardiovascular domain: LDL, systolic pressure (level and trend), HDL,
//! and a smoking note flag.

use chrono::NaiveDateTime;
use serde_json::json;

use crate::config::ScorerConfig;
use crate::features::LongitudinalFeatures;
use crate::metrics::MetricKey;

use super::{
    finalize_domain, mean_contribution, mean_contribution_descending, slope_contribution,
    stale_critical_metrics, tag_contribution, AscendingBands, DescendingBands, DomainResult,
};

pub const CONDITION: &str = "cardiovascular";

/// Both must be fresh or the domain resolves to Unknown.
const CRITICAL: &[MetricKey] = &[MetricKey::Ldl, MetricKey::Sbp];

const LDL_BANDS: AscendingBands = AscendingBands(&[
    (100.0, 0.0),
    (130.0, 0.25),
    (160.0, 0.5),
    (189.0, 0.75),
    (f64::INFINITY, 1.0),
]);

const SBP_BANDS: AscendingBands = AscendingBands(&[
    (120.0, 0.0),
    (129.0, 0.2),
    (139.0, 0.5),
    (159.0, 0.75),
    (f64::INFINITY, 1.0),
]);

/// Sustained upward drift in systolic pressure, mmHg per day.
const SBP_SLOPE_BANDS: AscendingBands =
    AscendingBands(&[(0.0, 0.0), (0.1, 0.3), (0.5, 0.6), (f64::INFINITY, 0.9)]);

const HDL_BANDS: DescendingBands =
    DescendingBands(&[(60.0, 0.0), (40.0, 0.4), (f64::NEG_INFINITY, 0.8)]);

pub fn score(
    features: &LongitudinalFeatures,
    config: &ScorerConfig,
    now: NaiveDateTime,
) -> DomainResult {
    let contributions: Vec<_> = [
        mean_contribution(features, MetricKey::Ldl, &[90, 365], &LDL_BANDS, "ldl_mean", 0.35),
        mean_contribution(features, MetricKey::Sbp, &[30, 90], &SBP_BANDS, "sbp_mean", 0.3),
        slope_contribution(features, MetricKey::Sbp, 90, &SBP_SLOPE_BANDS, "sbp_trend", 0.1),
        mean_contribution_descending(
            features,
            MetricKey::Hdl,
            &[90, 365],
            &HDL_BANDS,
            "hdl_mean",
            0.15,
        ),
        tag_contribution(features, "smoking", "smoking_flag", 0.1, 0.9),
    ]
    .into_iter()
    .flatten()
    .collect();

    let snapshot = json!({
        "ldl_mean": features.mean_preferring(MetricKey::Ldl, &[90, 365]).map(|(v, _)| v),
        "sbp_mean": features.mean_preferring(MetricKey::Sbp, &[30, 90]).map(|(v, _)| v),
        "sbp_slope_90d": features.slope_per_day(MetricKey::Sbp, 90),
        "hdl_mean": features.mean_preferring(MetricKey::Hdl, &[90, 365]).map(|(v, _)| v),
        "smoking": features.has_tag("smoking"),
    });

    let stale = stale_critical_metrics(features, CRITICAL, now, config.stale_after_days);

    finalize_domain(CONDITION, contributions, stale, snapshot, config, now)
}
