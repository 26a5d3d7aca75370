pub mod encounter;
pub mod lab;
pub mod medication;
pub mod note;
pub mod patient;
pub mod vital;

pub use encounter::EncounterRow;
pub use lab::LabRow;
pub use medication::MedicationRow;
pub use note::NoteRow;
pub use patient::{Patient, Sex};
pub use vital::VitalRow;
