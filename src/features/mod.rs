//! Longitudinal feature construction: raw dataset snapshot → per-metric
//! rolling statistics plus medication, encounter, and note aggregates.

pub mod stats;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dataset::PatientDataset;
use crate::metrics::{MetricKey, MetricSample};
use crate::normalize::{normalize_lab, normalize_vital};

pub use stats::WindowStats;

use stats::{compute_window_stats, days_between};

/// Trailing window lengths, in days, computed for every metric.
pub const WINDOW_DAYS: [i64; 4] = [7, 30, 90, 365];

fn window_label(days: i64) -> String {
    format!("{days}d")
}

/// Rolling statistics for one metric: the latest sample plus one
/// [`WindowStats`] block per configured window ("7d", "30d", "90d", "365d").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricFeatures {
    pub latest: Option<MetricSample>,
    pub windows: BTreeMap<String, WindowStats>,
}

impl MetricFeatures {
    pub fn window(&self, days: i64) -> Option<&WindowStats> {
        self.windows.get(&window_label(days))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationStats {
    pub active: usize,
    pub started_last_90_days: usize,
    pub adherence_issues: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterStats {
    pub er_visits_90_days: usize,
    pub inpatient_365_days: usize,
    pub total_365_days: usize,
}

/// De-duplicated, lower-cased tag set extracted from clinical notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFlags {
    pub tags: BTreeSet<String>,
    pub latest_note_at: Option<NaiveDateTime>,
}

/// Per-patient feature aggregate: everything the domain scorers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongitudinalFeatures {
    pub generated_at: NaiveDateTime,
    pub metrics: BTreeMap<MetricKey, MetricFeatures>,
    pub medication_stats: MedicationStats,
    pub encounter_stats: EncounterStats,
    pub note_flags: NoteFlags,
}

impl LongitudinalFeatures {
    pub fn metric(&self, key: MetricKey) -> Option<&MetricFeatures> {
        self.metrics.get(&key)
    }

    pub fn window(&self, key: MetricKey, days: i64) -> Option<&WindowStats> {
        self.metric(key)?.window(days)
    }

    /// Window mean for `key`, trying each window length in order and
    /// returning the first present mean along with the window it came from.
    pub fn mean_preferring(&self, key: MetricKey, windows: &[i64]) -> Option<(f64, i64)> {
        windows
            .iter()
            .find_map(|&days| self.window(key, days)?.mean.map(|m| (m, days)))
    }

    pub fn slope_per_day(&self, key: MetricKey, days: i64) -> Option<f64> {
        self.window(key, days)?.slope_per_day
    }

    pub fn latest_taken_at(&self, key: MetricKey) -> Option<NaiveDateTime> {
        self.metric(key)?.latest.as_ref().map(|s| s.taken_at)
    }

    /// Days since the metric's most recent sample of any age.
    pub fn days_since_latest(&self, key: MetricKey, now: NaiveDateTime) -> Option<f64> {
        self.latest_taken_at(key).map(|t| days_between(now, t))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.note_flags.tags.contains(tag)
    }
}

/// Build the full per-patient feature set from a dataset snapshot.
/// Pure: `now` is explicit, the dataset is read-only, and repeated calls
/// yield identical output.
pub fn build_longitudinal_features(
    dataset: &PatientDataset,
    now: NaiveDateTime,
) -> LongitudinalFeatures {
    let mut by_metric: BTreeMap<MetricKey, Vec<MetricSample>> = BTreeMap::new();

    for row in &dataset.vitals {
        for (key, sample) in normalize_vital(row) {
            by_metric.entry(key).or_default().push(sample);
        }
    }
    for row in &dataset.labs {
        if let Some((key, sample)) = normalize_lab(row) {
            by_metric.entry(key).or_default().push(sample);
        }
    }

    let mut metrics = BTreeMap::new();
    for (key, mut series) in by_metric {
        series.sort_by_key(|s| s.taken_at);

        let windows = WINDOW_DAYS
            .iter()
            .map(|&days| (window_label(days), compute_window_stats(&series, days, now)))
            .collect();

        tracing::debug!(metric = key.as_str(), samples = series.len(), "metric series built");

        metrics.insert(
            key,
            MetricFeatures {
                latest: series.last().cloned(),
                windows,
            },
        );
    }

    LongitudinalFeatures {
        generated_at: now,
        metrics,
        medication_stats: medication_stats(dataset, now),
        encounter_stats: encounter_stats(dataset, now),
        note_flags: note_flags(dataset),
    }
}

fn medication_stats(dataset: &PatientDataset, now: NaiveDateTime) -> MedicationStats {
    MedicationStats {
        active: dataset.medications.iter().filter(|m| m.is_active_at(now)).count(),
        started_last_90_days: dataset
            .medications
            .iter()
            .filter(|m| m.started_within_days(now, 90))
            .count(),
        adherence_issues: dataset
            .medications
            .iter()
            .filter(|m| m.has_adherence_issue())
            .count(),
    }
}

fn encounter_stats(dataset: &PatientDataset, now: NaiveDateTime) -> EncounterStats {
    let within = |days: i64, t: Option<NaiveDateTime>| {
        t.is_some_and(|t| t <= now && t >= now - Duration::days(days))
    };

    EncounterStats {
        er_visits_90_days: dataset
            .encounters
            .iter()
            .filter(|e| e.is_er() && within(90, e.start_at))
            .count(),
        inpatient_365_days: dataset
            .encounters
            .iter()
            .filter(|e| e.is_inpatient() && within(365, e.start_at))
            .count(),
        total_365_days: dataset
            .encounters
            .iter()
            .filter(|e| within(365, e.start_at))
            .count(),
    }
}

fn note_flags(dataset: &PatientDataset) -> NoteFlags {
    let tags = dataset
        .notes
        .iter()
        .flat_map(|n| n.tags.iter())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    NoteFlags {
        tags,
        latest_note_at: dataset.notes.iter().filter_map(|n| n.created_at).max(),
    }
}
