use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical short name for a measured quantity. Closed set: every sample in
/// the engine is keyed by one of these, and each key fixes the canonical
/// unit all downstream arithmetic assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Sbp,
    Dbp,
    HeartRate,
    Temperature,
    Spo2,
    Weight,
    Height,
    Bmi,
    Ldl,
    Hdl,
    TotalCholesterol,
    Triglycerides,
    Glucose,
    Hba1c,
    Creatinine,
    Egfr,
}

impl MetricKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Sbp => "sbp",
            MetricKey::Dbp => "dbp",
            MetricKey::HeartRate => "heart_rate",
            MetricKey::Temperature => "temperature",
            MetricKey::Spo2 => "spo2",
            MetricKey::Weight => "weight",
            MetricKey::Height => "height",
            MetricKey::Bmi => "bmi",
            MetricKey::Ldl => "ldl",
            MetricKey::Hdl => "hdl",
            MetricKey::TotalCholesterol => "total_cholesterol",
            MetricKey::Triglycerides => "triglycerides",
            MetricKey::Glucose => "glucose",
            MetricKey::Hba1c => "hba1c",
            MetricKey::Creatinine => "creatinine",
            MetricKey::Egfr => "egfr",
        }
    }

    /// Display name used in factor detail strings.
    pub fn display_name(self) -> &'static str {
        match self {
            MetricKey::Sbp => "Systolic BP",
            MetricKey::Dbp => "Diastolic BP",
            MetricKey::HeartRate => "Heart rate",
            MetricKey::Temperature => "Temperature",
            MetricKey::Spo2 => "SpO2",
            MetricKey::Weight => "Weight",
            MetricKey::Height => "Height",
            MetricKey::Bmi => "BMI",
            MetricKey::Ldl => "LDL cholesterol",
            MetricKey::Hdl => "HDL cholesterol",
            MetricKey::TotalCholesterol => "Total cholesterol",
            MetricKey::Triglycerides => "Triglycerides",
            MetricKey::Glucose => "Glucose",
            MetricKey::Hba1c => "HbA1c",
            MetricKey::Creatinine => "Creatinine",
            MetricKey::Egfr => "eGFR",
        }
    }

    /// Canonical unit for this metric. Informational; all arithmetic assumes
    /// values were converted to this unit at normalization.
    pub fn canonical_unit(self) -> &'static str {
        match self {
            MetricKey::Sbp | MetricKey::Dbp => "mmHg",
            MetricKey::HeartRate => "bpm",
            MetricKey::Temperature => "°C",
            MetricKey::Spo2 => "%",
            MetricKey::Weight => "kg",
            MetricKey::Height => "cm",
            MetricKey::Bmi => "kg/m²",
            MetricKey::Ldl
            | MetricKey::Hdl
            | MetricKey::TotalCholesterol
            | MetricKey::Triglycerides
            | MetricKey::Glucose
            | MetricKey::Creatinine => "mg/dL",
            MetricKey::Hba1c => "%",
            MetricKey::Egfr => "mL/min/1.73m²",
        }
    }

    /// Physiologic plausibility band in the canonical unit. Values outside
    /// the band are dropped at normalization, never clamped to the boundary.
    pub fn plausible_range(self) -> (f64, f64) {
        match self {
            MetricKey::Sbp => (60.0, 260.0),
            MetricKey::Dbp => (30.0, 160.0),
            MetricKey::HeartRate => (30.0, 220.0),
            MetricKey::Temperature => (30.0, 45.0),
            MetricKey::Spo2 => (50.0, 100.0),
            MetricKey::Weight => (20.0, 400.0),
            MetricKey::Height => (50.0, 260.0),
            MetricKey::Bmi => (8.0, 100.0),
            MetricKey::Ldl => (10.0, 500.0),
            MetricKey::Hdl => (5.0, 200.0),
            MetricKey::TotalCholesterol => (50.0, 600.0),
            MetricKey::Triglycerides => (10.0, 2000.0),
            MetricKey::Glucose => (20.0, 1000.0),
            MetricKey::Hba1c => (3.0, 20.0),
            MetricKey::Creatinine => (0.1, 25.0),
            MetricKey::Egfr => (1.0, 200.0),
        }
    }

    pub fn is_plausible(self, value: f64) -> bool {
        let (lo, hi) = self.plausible_range();
        value.is_finite() && value >= lo && value <= hi
    }
}

/// Provenance of a canonical sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    Vital,
    Lab,
    /// Computed from other samples (e.g. BMI from weight and height).
    Derived,
}

/// One canonicalized observation: numeric value in the metric's canonical
/// unit, timestamp, provenance, and the reference range inherited from the
/// source row (converted to the canonical unit alongside the value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub value: f64,
    pub taken_at: NaiveDateTime,
    pub source: SampleSource,
    pub unit: String,
    pub ref_low: Option<f64>,
    pub ref_high: Option<f64>,
}

impl MetricSample {
    /// Build a sample, enforcing the plausibility invariant. Non-finite or
    /// out-of-band values yield `None`.
    pub fn checked(
        metric: MetricKey,
        value: f64,
        taken_at: NaiveDateTime,
        source: SampleSource,
        ref_low: Option<f64>,
        ref_high: Option<f64>,
    ) -> Option<Self> {
        if !metric.is_plausible(value) {
            return None;
        }
        Some(Self {
            value,
            taken_at,
            source,
            unit: metric.canonical_unit().to_string(),
            ref_low,
            ref_high,
        })
    }

    pub fn has_range(&self) -> bool {
        self.ref_low.is_some() || self.ref_high.is_some()
    }

    /// Whether the value sits inside the inherited reference range.
    /// `None` when the sample carries no range at all.
    pub fn in_range(&self) -> Option<bool> {
        if !self.has_range() {
            return None;
        }
        let above_low = self.ref_low.map_or(true, |lo| self.value >= lo);
        let below_high = self.ref_high.map_or(true, |hi| self.value <= hi);
        Some(above_low && below_high)
    }
}
