use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One raw vital-sign reading as fetched from the data store. A single row
/// may carry several measurements taken together (blood pressure, pulse,
/// temperature, anthropometrics); the normalizer fans it out into one
/// canonical sample per present field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalRow {
    pub id: Uuid,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<f64>,
    /// Diastolic blood pressure, mmHg.
    pub dbp: Option<f64>,
    /// Heart rate, bpm.
    pub hr: Option<f64>,
    /// Body temperature in the unit given by `temp_unit` (or unlabeled).
    pub temp: Option<f64>,
    pub temp_unit: Option<String>,
    /// Oxygen saturation, percent.
    pub spo2: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// Recorded BMI; when absent it is derived from weight and height.
    pub bmi: Option<f64>,
    pub taken_at: Option<NaiveDateTime>,
}
