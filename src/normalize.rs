//! Normalization of raw vital and lab rows into canonical `MetricSample`s.
//!
//! Pure functions: a row either yields samples in canonical units or yields
//! nothing. Missing fields, unrecognized codes, non-finite numbers, and
//! physiologically impossible values all resolve to absence, never to an
//! error.

use crate::metrics::{MetricKey, MetricSample, SampleSource};
use crate::models::{LabRow, VitalRow};

/// mmol/L → mg/dL for cholesterol fractions and triglycerides.
const LIPID_MMOL_TO_MG_DL: f64 = 38.67;
/// mmol/L → mg/dL for glucose.
const GLUCOSE_MMOL_TO_MG_DL: f64 = 18.0;
/// µmol/L → mg/dL for creatinine.
const CREATININE_UMOL_TO_MG_DL: f64 = 1.0 / 88.4;

/// Fan one vital row out into canonical samples: one per present field, plus
/// a derived BMI when the row has no usable recorded BMI but carries both
/// weight and height. Rows without a timestamp yield nothing.
pub fn normalize_vital(row: &VitalRow) -> Vec<(MetricKey, MetricSample)> {
    let Some(taken_at) = row.taken_at else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut push = |metric: MetricKey, value: Option<f64>, source: SampleSource| {
        if let Some(v) = value {
            if let Some(sample) = MetricSample::checked(metric, v, taken_at, source, None, None) {
                out.push((metric, sample));
            }
        }
    };

    push(MetricKey::Sbp, row.sbp, SampleSource::Vital);
    push(MetricKey::Dbp, row.dbp, SampleSource::Vital);
    push(MetricKey::HeartRate, row.hr, SampleSource::Vital);
    push(
        MetricKey::Temperature,
        row.temp.map(|t| to_celsius(t, row.temp_unit.as_deref())),
        SampleSource::Vital,
    );
    push(MetricKey::Spo2, row.spo2, SampleSource::Vital);
    push(MetricKey::Weight, row.weight_kg, SampleSource::Vital);
    push(MetricKey::Height, row.height_cm, SampleSource::Vital);

    // A plausible recorded BMI wins; otherwise (absent or dropped) fall back
    // to deriving one from weight and height.
    let recorded_bmi = row.bmi.filter(|&b| MetricKey::Bmi.is_plausible(b));
    if recorded_bmi.is_some() {
        push(MetricKey::Bmi, recorded_bmi, SampleSource::Vital);
    } else if let (Some(weight), Some(height)) = (row.weight_kg, row.height_cm) {
        let meters = height / 100.0;
        push(MetricKey::Bmi, Some(weight / (meters * meters)), SampleSource::Derived);
    }

    out
}

/// Normalize one lab row: resolve the upper-cased test code against the
/// synonym table, convert value and reference bounds to the canonical unit,
/// and validate plausibility. Unrecognized codes and incomplete rows yield
/// `None`.
pub fn normalize_lab(row: &LabRow) -> Option<(MetricKey, MetricSample)> {
    let code = row.test_code.as_deref()?.trim().to_uppercase();
    let metric = metric_for_lab_code(&code)?;
    let raw = row.value.filter(|v| v.is_finite())?;
    let taken_at = row.taken_at?;

    let factor = lab_conversion_factor(metric, row.unit.as_deref());
    let ref_low = row.ref_low.filter(|v| v.is_finite()).map(|v| v * factor);
    let ref_high = row.ref_high.filter(|v| v.is_finite()).map(|v| v * factor);

    MetricSample::checked(metric, raw * factor, taken_at, SampleSource::Lab, ref_low, ref_high)
        .map(|sample| (metric, sample))
}

/// Fixed synonym table from upper-cased lab test codes to metric keys.
fn metric_for_lab_code(code: &str) -> Option<MetricKey> {
    match code {
        "LDL" | "LDL-C" | "LDLC" | "LDL CHOLESTEROL" => Some(MetricKey::Ldl),
        "HDL" | "HDL-C" | "HDLC" | "HDL CHOLESTEROL" => Some(MetricKey::Hdl),
        "CHOL" | "TC" | "CHOLESTEROL" | "TOTAL CHOLESTEROL" => Some(MetricKey::TotalCholesterol),
        "TRIG" | "TG" | "TRIGLYCERIDES" => Some(MetricKey::Triglycerides),
        "GLU" | "GLUC" | "GLUCOSE" | "FBG" | "FPG" => Some(MetricKey::Glucose),
        "HBA1C" | "A1C" | "HGBA1C" | "HB A1C" => Some(MetricKey::Hba1c),
        "CREAT" | "CR" | "CREATININE" | "SCR" => Some(MetricKey::Creatinine),
        "EGFR" | "GFR" => Some(MetricKey::Egfr),
        _ => None,
    }
}

/// Multiplicative factor from the row's unit to the metric's canonical unit.
/// Unrecognized or absent units are assumed already canonical.
fn lab_conversion_factor(metric: MetricKey, unit: Option<&str>) -> f64 {
    let unit = unit.map(|u| u.trim().to_lowercase()).unwrap_or_default();
    match metric {
        MetricKey::Ldl
        | MetricKey::Hdl
        | MetricKey::TotalCholesterol
        | MetricKey::Triglycerides
            if unit.contains("mmol") =>
        {
            LIPID_MMOL_TO_MG_DL
        }
        MetricKey::Glucose if unit.contains("mmol") => GLUCOSE_MMOL_TO_MG_DL,
        MetricKey::Creatinine if unit.contains("umol") || unit.contains("µmol") => {
            CREATININE_UMOL_TO_MG_DL
        }
        _ => 1.0,
    }
}

/// Convert a temperature reading to Celsius. An explicit Fahrenheit unit
/// wins; an unlabeled value above 45 is heuristically treated as Fahrenheit
/// (no survivable body temperature exceeds 45 °C).
fn to_celsius(value: f64, unit: Option<&str>) -> f64 {
    let fahrenheit = match unit.map(|u| u.trim().to_lowercase()) {
        Some(u) if u.contains('f') => true,
        Some(u) if u.contains('c') => false,
        _ => value > 45.0,
    };
    if fahrenheit {
        (value - 32.0) * 5.0 / 9.0
    } else {
        value
    }
}
