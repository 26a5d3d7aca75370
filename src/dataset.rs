//! Dataset snapshot and the asynchronous fetch boundary.
//!
//! The engine never talks to a data store directly. A collaborator
//! implementing [`PatientDataSource`] supplies six independent reads;
//! [`fetch_patient_dataset`] issues them concurrently and joins the results
//! into one immutable [`PatientDataset`] snapshot. Everything downstream of
//! the snapshot is pure, synchronous computation.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{EncounterRow, LabRow, MedicationRow, NoteRow, Patient, VitalRow};

/// Pre-fetched patient data for one scoring run. Building the snapshot up
/// front keeps the feature builder and domain scorers pure and testable.
#[derive(Debug, Clone)]
pub struct PatientDataset {
    pub patient: Patient,
    pub vitals: Vec<VitalRow>,
    pub labs: Vec<LabRow>,
    pub medications: Vec<MedicationRow>,
    pub encounters: Vec<EncounterRow>,
    pub notes: Vec<NoteRow>,
}

impl PatientDataset {
    /// Snapshot with no observations, used as a base in tests and for
    /// patients with empty records.
    pub fn empty(patient: Patient) -> Self {
        Self {
            patient,
            vitals: Vec::new(),
            labs: Vec::new(),
            medications: Vec::new(),
            encounters: Vec::new(),
            notes: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Patient not found: {0}")]
    PatientNotFound(Uuid),

    #[error("Data source read failed: {0}")]
    Source(String),
}

/// External data-store collaborator. Each read is independent; the engine
/// imposes no ordering between them.
#[allow(async_fn_in_trait)]
pub trait PatientDataSource {
    async fn fetch_patient(&self, patient_id: Uuid) -> Result<Patient, DatasetError>;
    async fn fetch_vitals(&self, patient_id: Uuid) -> Result<Vec<VitalRow>, DatasetError>;
    async fn fetch_labs(&self, patient_id: Uuid) -> Result<Vec<LabRow>, DatasetError>;
    async fn fetch_medications(&self, patient_id: Uuid)
        -> Result<Vec<MedicationRow>, DatasetError>;
    async fn fetch_encounters(&self, patient_id: Uuid)
        -> Result<Vec<EncounterRow>, DatasetError>;
    async fn fetch_notes(&self, patient_id: Uuid) -> Result<Vec<NoteRow>, DatasetError>;
}

/// Fan out the six reads concurrently and fan in to a single snapshot.
/// Any failed read fails the whole fetch; the engine has no partial-dataset
/// mode.
pub async fn fetch_patient_dataset<S: PatientDataSource>(
    source: &S,
    patient_id: Uuid,
) -> Result<PatientDataset, DatasetError> {
    let (patient, vitals, labs, medications, encounters, notes) = tokio::try_join!(
        source.fetch_patient(patient_id),
        source.fetch_vitals(patient_id),
        source.fetch_labs(patient_id),
        source.fetch_medications(patient_id),
        source.fetch_encounters(patient_id),
        source.fetch_notes(patient_id),
    )?;

    Ok(PatientDataset {
        patient,
        vitals,
        labs,
        medications,
        encounters,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixtureSource {
        patient: Patient,
        fail_labs: bool,
    }

    impl PatientDataSource for FixtureSource {
        async fn fetch_patient(&self, patient_id: Uuid) -> Result<Patient, DatasetError> {
            if self.patient.id == patient_id {
                Ok(self.patient.clone())
            } else {
                Err(DatasetError::PatientNotFound(patient_id))
            }
        }

        async fn fetch_vitals(&self, _: Uuid) -> Result<Vec<VitalRow>, DatasetError> {
            Ok(vec![VitalRow::default()])
        }

        async fn fetch_labs(&self, _: Uuid) -> Result<Vec<LabRow>, DatasetError> {
            if self.fail_labs {
                Err(DatasetError::Source("lab store unavailable".into()))
            } else {
                Ok(vec![LabRow::default(), LabRow::default()])
            }
        }

        async fn fetch_medications(&self, _: Uuid) -> Result<Vec<MedicationRow>, DatasetError> {
            Ok(Vec::new())
        }

        async fn fetch_encounters(&self, _: Uuid) -> Result<Vec<EncounterRow>, DatasetError> {
            Ok(Vec::new())
        }

        async fn fetch_notes(&self, _: Uuid) -> Result<Vec<NoteRow>, DatasetError> {
            Ok(Vec::new())
        }
    }

    fn fixture_patient() -> Patient {
        Patient { id: Uuid::new_v4(), birth_date: None, sex: None }
    }

    #[tokio::test]
    async fn fetch_joins_all_reads() {
        let patient = fixture_patient();
        let source = FixtureSource { patient: patient.clone(), fail_labs: false };

        let dataset = fetch_patient_dataset(&source, patient.id).await.unwrap();
        assert_eq!(dataset.patient.id, patient.id);
        assert_eq!(dataset.vitals.len(), 1);
        assert_eq!(dataset.labs.len(), 2);
    }

    #[tokio::test]
    async fn fetch_fails_when_any_read_fails() {
        let patient = fixture_patient();
        let source = FixtureSource { patient: patient.clone(), fail_labs: true };

        let err = fetch_patient_dataset(&source, patient.id).await.unwrap_err();
        assert!(matches!(err, DatasetError::Source(_)));
    }

    #[tokio::test]
    async fn fetch_propagates_missing_patient() {
        let source = FixtureSource { patient: fixture_patient(), fail_labs: false };

        let err = fetch_patient_dataset(&source, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DatasetError::PatientNotFound(_)));
    }
}
