//! Domain scoring: per-patient features → one banded risk result per
//! clinical domain (cardiovascular, metabolic, renal).
//!
//! Each domain is a pure mapping function over [`LongitudinalFeatures`]:
//! fixed weighted contributions, monotonic step tables for sub-scores,
//! weighted aggregation, Low/Moderate/High banding, and a staleness override
//! that resolves to Unknown when critical inputs are missing or old.

pub mod cardiovascular;
pub mod metabolic;
pub mod renal;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ScorerConfig;
use crate::dataset::PatientDataset;
use crate::features::{build_longitudinal_features, LongitudinalFeatures};
use crate::metrics::MetricKey;

/// Qualitative risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
    /// Produced only by the staleness/no-data path, never by the numeric
    /// banding rule.
    Unknown,
}

impl RiskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::High => "High",
            RiskLabel::Unknown => "Unknown",
        }
    }

    /// Band a computed score: >= 0.66 High, >= 0.33 Moderate, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.66 {
            RiskLabel::High
        } else if score >= 0.33 {
            RiskLabel::Moderate
        } else {
            RiskLabel::Low
        }
    }
}

/// One ranked explanation entry on a domain result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub detail: String,
}

/// Risk result for one clinical domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    pub condition: String,
    /// Weighted aggregate in [0, 1]; 0 when the label is Unknown.
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    /// Up to 4 contributions ranked descending by weight × score.
    pub top_factors: Vec<RiskFactor>,
    /// Opaque per-domain snapshot of the metric values that fed the score.
    pub features: serde_json::Value,
    pub generated_at: NaiveDateTime,
    /// Model version tag, fixed per configuration.
    pub model: String,
}

/// Feature set plus the domain results computed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskComputation {
    pub features: LongitudinalFeatures,
    pub domains: Vec<DomainResult>,
}

/// Build features once, then map them through every domain scorer.
pub fn compute_domain_results(
    dataset: &PatientDataset,
    config: &ScorerConfig,
    now: NaiveDateTime,
) -> RiskComputation {
    let features = build_longitudinal_features(dataset, now);

    let domains = vec![
        cardiovascular::score(&features, config, now),
        metabolic::score(&features, config, now),
        renal::score(&features, config, now),
    ];

    RiskComputation { features, domains }
}

// ---------------------------------------------------------------------------
// Shared scoring machinery
// ---------------------------------------------------------------------------

/// One weighted contribution to a domain score, already converted to a
/// sub-score in [0, 1].
#[derive(Debug, Clone)]
pub(crate) struct Contribution {
    pub name: &'static str,
    pub weight: f64,
    pub score: f64,
    pub detail: String,
}

impl Contribution {
    fn rank(&self) -> f64 {
        self.weight * self.score
    }
}

/// Ascending step table for "higher is worse" metrics: `(max, score)` pairs
/// evaluated by the first entry whose max bound is not exceeded. The last
/// entry's bound is `f64::INFINITY`.
pub(crate) struct AscendingBands(pub &'static [(f64, f64)]);

impl AscendingBands {
    pub fn score(&self, value: f64) -> f64 {
        self.0
            .iter()
            .find(|(max, _)| value <= *max)
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
    }
}

/// Descending step table for "lower is worse" metrics: `(min, score)` pairs
/// evaluated by the first entry whose min bound the value still meets. The
/// last entry's bound is `f64::NEG_INFINITY`.
pub(crate) struct DescendingBands(pub &'static [(f64, f64)]);

impl DescendingBands {
    pub fn score(&self, value: f64) -> f64 {
        self.0
            .iter()
            .find(|(min, _)| value >= *min)
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
    }
}

/// Contribution from a window mean, using the first window in `windows`
/// that has one.
pub(crate) fn mean_contribution(
    features: &LongitudinalFeatures,
    key: MetricKey,
    windows: &[i64],
    bands: &AscendingBands,
    name: &'static str,
    weight: f64,
) -> Option<Contribution> {
    let (mean, window) = features.mean_preferring(key, windows)?;
    Some(Contribution {
        name,
        weight,
        score: bands.score(mean),
        detail: format!(
            "{} mean {:.1} {} over last {} days",
            key.display_name(),
            mean,
            key.canonical_unit(),
            window
        ),
    })
}

/// Contribution from a window mean with a descending ("lower is worse")
/// table.
pub(crate) fn mean_contribution_descending(
    features: &LongitudinalFeatures,
    key: MetricKey,
    windows: &[i64],
    bands: &DescendingBands,
    name: &'static str,
    weight: f64,
) -> Option<Contribution> {
    let (mean, window) = features.mean_preferring(key, windows)?;
    Some(Contribution {
        name,
        weight,
        score: bands.score(mean),
        detail: format!(
            "{} mean {:.1} {} over last {} days",
            key.display_name(),
            mean,
            key.canonical_unit(),
            window
        ),
    })
}

/// Contribution from a per-day trend slope over one window.
pub(crate) fn slope_contribution(
    features: &LongitudinalFeatures,
    key: MetricKey,
    days: i64,
    bands: &AscendingBands,
    name: &'static str,
    weight: f64,
) -> Option<Contribution> {
    let slope = features.slope_per_day(key, days)?;
    Some(Contribution {
        name,
        weight,
        score: bands.score(slope),
        detail: format!(
            "{} trend {:+.2} {}/day over last {} days",
            key.display_name(),
            slope,
            key.canonical_unit(),
            days
        ),
    })
}

/// Fixed-score categorical contribution from a note tag.
pub(crate) fn tag_contribution(
    features: &LongitudinalFeatures,
    tag: &str,
    name: &'static str,
    weight: f64,
    score: f64,
) -> Option<Contribution> {
    features.has_tag(tag).then(|| Contribution {
        name,
        weight,
        score,
        detail: format!("Clinical note flag: {tag}"),
    })
}

/// Critical metrics that are missing entirely or whose latest sample is
/// older than the freshness threshold.
pub(crate) fn stale_critical_metrics(
    features: &LongitudinalFeatures,
    critical: &[MetricKey],
    now: NaiveDateTime,
    stale_after_days: i64,
) -> Vec<MetricKey> {
    critical
        .iter()
        .copied()
        .filter(|&key| match features.days_since_latest(key, now) {
            None => true,
            Some(days) => days > stale_after_days as f64,
        })
        .collect()
}

fn weighted_aggregate(contributions: &[Contribution]) -> Option<f64> {
    let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
    if contributions.is_empty() || total_weight == 0.0 {
        return None;
    }
    let weighted: f64 = contributions.iter().map(|c| c.weight * c.score).sum();
    Some(weighted / total_weight)
}

fn top_factors(contributions: &[Contribution], limit: usize) -> Vec<RiskFactor> {
    let mut ranked: Vec<&Contribution> = contributions.iter().collect();
    ranked.sort_by(|a, b| b.rank().partial_cmp(&a.rank()).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(limit)
        .map(|c| RiskFactor { name: c.name.to_string(), detail: c.detail.clone() })
        .collect()
}

/// Aggregate contributions into a final `DomainResult`, applying the
/// staleness override and the no-data fallback.
pub(crate) fn finalize_domain(
    condition: &'static str,
    contributions: Vec<Contribution>,
    stale: Vec<MetricKey>,
    snapshot: serde_json::Value,
    config: &ScorerConfig,
    now: NaiveDateTime,
) -> DomainResult {
    if !stale.is_empty() {
        let names: Vec<&str> = stale.iter().map(|k| k.display_name()).collect();
        tracing::debug!(
            condition,
            stale = ?names,
            "critical metrics stale or missing; forcing Unknown"
        );

        let mut factors = vec![RiskFactor {
            name: "stale_critical_data".to_string(),
            detail: format!("Missing or stale critical metrics: {}", names.join(", ")),
        }];
        factors.extend(top_factors(&contributions, 3));

        return DomainResult {
            condition: condition.to_string(),
            risk_score: 0.0,
            risk_label: RiskLabel::Unknown,
            top_factors: factors,
            features: snapshot,
            generated_at: now,
            model: config.model_version.clone(),
        };
    }

    match weighted_aggregate(&contributions) {
        Some(score) => DomainResult {
            condition: condition.to_string(),
            risk_score: score,
            risk_label: RiskLabel::from_score(score),
            top_factors: top_factors(&contributions, 4),
            features: snapshot,
            generated_at: now,
            model: config.model_version.clone(),
        },
        None => DomainResult {
            condition: condition.to_string(),
            risk_score: 0.0,
            risk_label: RiskLabel::Unknown,
            top_factors: vec![RiskFactor {
                name: "no_data".to_string(),
                detail: "No contributing metric had recent data".to_string(),
            }],
            features: snapshot,
            generated_at: now,
            model: config.model_version.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn contribution(name: &'static str, weight: f64, score: f64) -> Contribution {
        Contribution { name, weight, score, detail: name.to_string() }
    }

    #[test]
    fn banding_thresholds() {
        assert_eq!(RiskLabel::from_score(0.0), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(0.32), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(0.33), RiskLabel::Moderate);
        assert_eq!(RiskLabel::from_score(0.65), RiskLabel::Moderate);
        assert_eq!(RiskLabel::from_score(0.66), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(1.0), RiskLabel::High);
    }

    #[test]
    fn ascending_bands_pick_first_unexceeded_max() {
        let bands = AscendingBands(&[(100.0, 0.0), (160.0, 0.5), (f64::INFINITY, 1.0)]);
        assert_eq!(bands.score(80.0), 0.0);
        assert_eq!(bands.score(100.0), 0.0);
        assert_eq!(bands.score(100.1), 0.5);
        assert_eq!(bands.score(200.0), 1.0);
    }

    #[test]
    fn descending_bands_pick_first_met_min() {
        let bands = DescendingBands(&[(90.0, 0.0), (60.0, 0.3), (f64::NEG_INFINITY, 1.0)]);
        assert_eq!(bands.score(95.0), 0.0);
        assert_eq!(bands.score(90.0), 0.0);
        assert_eq!(bands.score(75.0), 0.3);
        assert_eq!(bands.score(20.0), 1.0);
    }

    #[test]
    fn equal_weights_average_to_midpoint() {
        let contributions = vec![contribution("a", 0.5, 0.0), contribution("b", 0.5, 1.0)];
        let score = weighted_aggregate(&contributions).unwrap();
        assert!((score - 0.5).abs() < 1e-12);
        assert_eq!(RiskLabel::from_score(score), RiskLabel::Moderate);
    }

    #[test]
    fn aggregate_absent_without_contributions() {
        assert!(weighted_aggregate(&[]).is_none());
    }

    #[test]
    fn top_factors_ranked_by_weight_times_score() {
        let contributions = vec![
            contribution("low_rank", 0.1, 0.5),
            contribution("high_rank", 0.5, 0.9),
            contribution("mid_rank", 0.4, 0.6),
        ];
        let factors = top_factors(&contributions, 4);
        assert_eq!(factors[0].name, "high_rank");
        assert_eq!(factors[1].name, "mid_rank");
        assert_eq!(factors[2].name, "low_rank");
    }

    #[test]
    fn top_factors_capped_at_limit() {
        let contributions: Vec<Contribution> =
            (0..6).map(|_| contribution("c", 0.2, 0.5)).collect();
        assert_eq!(top_factors(&contributions, 4).len(), 4);
    }

    #[test]
    fn finalize_with_stale_critical_forces_unknown() {
        let contributions = vec![contribution("ldl_mean", 0.5, 1.0)];
        let result = finalize_domain(
            "cardiovascular",
            contributions,
            vec![MetricKey::Sbp],
            serde_json::Value::Null,
            &ScorerConfig::default(),
            now(),
        );

        assert_eq!(result.risk_label, RiskLabel::Unknown);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.top_factors[0].name, "stale_critical_data");
        assert!(result.top_factors[0].detail.contains("Systolic BP"));
        // The computed contributions stay visible after the override entry.
        assert!(result.top_factors.iter().any(|f| f.name == "ldl_mean"));
    }

    #[test]
    fn finalize_without_data_is_unknown() {
        let result = finalize_domain(
            "renal",
            Vec::new(),
            Vec::new(),
            serde_json::Value::Null,
            &ScorerConfig::default(),
            now(),
        );
        assert_eq!(result.risk_label, RiskLabel::Unknown);
        assert_eq!(result.top_factors[0].name, "no_data");
    }
}
