use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One clinical note row as fetched from the data store. Only the tag list
/// and timestamp matter to the engine; note bodies never enter the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteRow {
    pub id: Uuid,
    pub created_at: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}
