use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient sex as recorded in the source system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Other => "other",
        }
    }
}

/// Patient profile row. Every demographic field is optional; the engine
/// tolerates absent data everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

impl Patient {
    /// Whole years of age at the given instant, when a birth date is known.
    pub fn age_at(&self, now: NaiveDateTime) -> Option<i32> {
        let birth = self.birth_date?;
        let today = now.date();
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        (age >= 0).then_some(age)
    }
}
