use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One medication order row as fetched from the data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
    /// Free-text adherence marker set by the source system (e.g. "missed
    /// refills"). Presence of a non-empty marker counts as an issue.
    pub adherence_mark: Option<String>,
}

impl MedicationRow {
    /// Active means started on or before `now` and either open-ended or not
    /// yet ended.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        match self.start_at {
            Some(start) if start <= now => self.end_at.map_or(true, |end| end >= now),
            _ => false,
        }
    }

    pub fn started_within_days(&self, now: NaiveDateTime, days: i64) -> bool {
        self.start_at
            .is_some_and(|start| start <= now && start >= now - Duration::days(days))
    }

    pub fn has_adherence_issue(&self) -> bool {
        self.adherence_mark
            .as_deref()
            .is_some_and(|mark| !mark.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn open_ended_medication_is_active() {
        let med = MedicationRow {
            start_at: Some(dt(2025, 1, 1)),
            ..Default::default()
        };
        assert!(med.is_active_at(dt(2026, 1, 1)));
    }

    #[test]
    fn ended_medication_is_not_active() {
        let med = MedicationRow {
            start_at: Some(dt(2025, 1, 1)),
            end_at: Some(dt(2025, 6, 1)),
            ..Default::default()
        };
        assert!(!med.is_active_at(dt(2026, 1, 1)));
    }

    #[test]
    fn medication_without_start_is_not_active() {
        let med = MedicationRow::default();
        assert!(!med.is_active_at(dt(2026, 1, 1)));
    }

    #[test]
    fn blank_adherence_mark_is_not_an_issue() {
        let med = MedicationRow {
            adherence_mark: Some("  ".into()),
            ..Default::default()
        };
        assert!(!med.has_adherence_issue());
    }
}
