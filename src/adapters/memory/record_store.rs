//! In-memory implementation of RecordStore.
//!
//! Mirrors the flat-file adapter's semantics (single lock, defensive
//! upserts) without touching disk. Used by unit tests and available for
//! local wiring.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::{merge, MergeOutcome, Season, SkinCode};
use crate::domain::record::{PatientRecord, PatientSummary};
use crate::ports::{NewPatient, RecordStore, StoreError};

/// Record store holding rows in a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: Mutex<Vec<PatientRecord>>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows, for assertions in tests.
    pub async fn rows(&self) -> Vec<PatientRecord> {
        self.rows.lock().await.clone()
    }

    async fn upsert_with<R>(
        &self,
        subject_id: SubjectId,
        apply: impl FnOnce(&mut PatientRecord) -> R + Send,
    ) -> R {
        let mut rows = self.rows.lock().await;
        let index = match rows.iter().position(|r| r.subject_id == subject_id) {
            Some(index) => index,
            None => {
                rows.push(PatientRecord::empty(subject_id));
                rows.len() - 1
            }
        };
        apply(&mut rows[index])
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, patient: NewPatient) -> Result<(), StoreError> {
        let mut record = PatientRecord::empty(patient.subject_id);
        record.age = Some(patient.age);
        record.sex = Some(patient.sex);
        record.allergies = Some(patient.allergies);

        self.rows.lock().await.push(record);
        Ok(())
    }

    async fn update_quiz_result(
        &self,
        subject_id: SubjectId,
        answers_json: &str,
        skin_code: &SkinCode,
    ) -> Result<(), StoreError> {
        self.upsert_with(subject_id, |record| {
            record.answers_json = Some(answers_json.to_string());
            record.skin_code = Some(skin_code.clone());
        })
        .await;
        Ok(())
    }

    async fn update_season(&self, subject_id: SubjectId, season: Season) -> Result<(), StoreError> {
        self.upsert_with(subject_id, |record| {
            record.season = Some(season);
        })
        .await;
        Ok(())
    }

    async fn update_external_result(
        &self,
        subject_id: SubjectId,
        external_code: &SkinCode,
    ) -> Result<MergeOutcome, StoreError> {
        let outcome = self
            .upsert_with(subject_id, |record| {
                let stored = record
                    .skin_code
                    .as_ref()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_default();
                let outcome = merge(&stored, external_code.as_str());

                record.external_skin_code = Some(external_code.as_str().to_string());
                record.match_percent = Some(outcome.match_percent);
                record.final_skin_type = Some(outcome.final_code.clone());
                outcome
            })
            .await;
        Ok(outcome)
    }

    async fn lookup(&self, subject_id: SubjectId) -> Result<Option<PatientSummary>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|r| r.subject_id == subject_id)
            .map(PatientSummary::from_record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Sex;

    #[tokio::test]
    async fn create_then_lookup_round_trips_demographics() {
        let store = InMemoryRecordStore::new();
        let id = SubjectId::new();
        store
            .create(NewPatient {
                subject_id: id,
                age: 30,
                sex: Sex::Male,
                allergies: "pollen".to_string(),
            })
            .await
            .unwrap();

        let summary = store.lookup(id).await.unwrap().unwrap();
        assert_eq!(summary.age, Some(30));
        assert_eq!(summary.allergies.as_deref(), Some("pollen"));
        assert!(summary.final_skin_type.is_none());
    }

    #[tokio::test]
    async fn updates_target_a_single_row() {
        let store = InMemoryRecordStore::new();
        let id = SubjectId::new();
        store
            .create(NewPatient {
                subject_id: id,
                age: 30,
                sex: Sex::Male,
                allergies: "none".to_string(),
            })
            .await
            .unwrap();

        store
            .update_quiz_result(id, "{}", &"OSPW".parse().unwrap())
            .await
            .unwrap();
        store.update_season(id, Season::SpringSummer).await.unwrap();
        store
            .update_external_result(id, &"OSPW".parse().unwrap())
            .await
            .unwrap();

        let rows = store.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].final_skin_type.as_deref(), Some("OSPW"));
    }
}
