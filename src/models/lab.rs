use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One raw laboratory result row as fetched from the data store.
/// `ref_low`/`ref_high` are in the same unit as `value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabRow {
    pub id: Uuid,
    pub test_code: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub ref_low: Option<f64>,
    pub ref_high: Option<f64>,
    pub taken_at: Option<NaiveDateTime>,
}
