use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One care encounter row as fetched from the data store. The type is a
/// free-text name ("ER visit", "Inpatient admission", ...); classification
/// is by lower-cased substring match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterRow {
    pub id: Uuid,
    pub encounter_type: Option<String>,
    pub start_at: Option<NaiveDateTime>,
}

impl EncounterRow {
    pub fn is_er(&self) -> bool {
        let Some(kind) = self.encounter_type.as_deref() else {
            return false;
        };
        let lower = kind.to_lowercase();
        // "er" alone would match inside words like "observation".
        lower == "er"
            || lower.starts_with("er ")
            || lower.contains("emergency")
            || lower.contains("ed visit")
    }

    pub fn is_inpatient(&self) -> bool {
        self.type_matches(&["inpatient", "admission", "hospitalization", "hospitalisation"])
    }

    fn type_matches(&self, patterns: &[&str]) -> bool {
        let Some(kind) = self.encounter_type.as_deref() else {
            return false;
        };
        let lower = kind.to_lowercase();
        patterns.iter().any(|p| lower.contains(p))
    }
}
