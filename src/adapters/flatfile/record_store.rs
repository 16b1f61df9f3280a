//! Flat-file implementation of RecordStore.
//!
//! Records live in a single JSON-lines file, one record per line in fixed
//! field order. Every mutation re-reads the whole file, mutates the matched
//! row, and rewrites the whole file through a write-to-temp-then-rename so a
//! crash mid-write never leaves a partial record set. One store-wide mutex
//! serializes every operation across sessions; throughput is bounded by
//! store size, which is the accepted cost of whole-file rewrite semantics.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::{merge, MergeOutcome, Season, SkinCode};
use crate::domain::record::{PatientRecord, PatientSummary};
use crate::ports::{NewPatient, RecordStore, StoreError};

/// JSON-lines record store over a single flat file.
///
/// The store path and the lock are construction state, not ambient globals,
/// so independent stores can coexist in one process (and in tests).
#[derive(Debug)]
pub struct FlatFileRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FlatFileRecordStore {
    /// Creates a store over the given file path. The file is created on
    /// first write; a missing file reads as an empty record set.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The file this store owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }

    /// Reads and parses every row. Caller must hold the lock.
    async fn read_all(&self) -> Result<Vec<PatientRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut rows = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: PatientRecord = serde_json::from_str(line)
                .map_err(|e| StoreError::corrupt(index + 1, e.to_string()))?;
            rows.push(record);
        }
        Ok(rows)
    }

    /// Rewrites the full record set atomically. Caller must hold the lock.
    async fn write_all(&self, rows: &[PatientRecord]) -> Result<(), StoreError> {
        let mut contents = String::new();
        for row in rows {
            let line = serde_json::to_string(row)
                .map_err(|e| StoreError::io(format!("Failed to encode record: {}", e)))?;
            contents.push_str(&line);
            contents.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::io(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, contents.as_bytes()).await.map_err(|e| {
            StoreError::io(format!("Failed to write {}: {}", temp.display(), e))
        })?;
        fs::rename(&temp, &self.path).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), rows = rows.len(), "record set rewritten");
        Ok(())
    }

    /// One locked read-modify-write against the row for `subject_id`. A
    /// missing row is synthesized empty before `apply` runs, so updates to
    /// unknown keys upsert instead of failing.
    async fn upsert_with<R, F>(&self, subject_id: SubjectId, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut PatientRecord) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut rows = self.read_all().await?;

        let position = rows.iter().position(|r| r.subject_id == subject_id);
        let index = match position {
            Some(index) => index,
            None => {
                rows.push(PatientRecord::empty(subject_id));
                rows.len() - 1
            }
        };

        let result = apply(&mut rows[index]);
        self.write_all(&rows).await?;
        Ok(result)
    }
}

#[async_trait]
impl RecordStore for FlatFileRecordStore {
    async fn create(&self, patient: NewPatient) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.read_all().await?;

        let mut record = PatientRecord::empty(patient.subject_id);
        record.age = Some(patient.age);
        record.sex = Some(patient.sex);
        record.allergies = Some(patient.allergies);
        rows.push(record);

        self.write_all(&rows).await
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
        .await
    }

    async fn update_season(&self, subject_id: SubjectId, season: Season) -> Result<(), StoreError> {
        self.upsert_with(subject_id, |record| {
            record.season = Some(season);
        })
        .await
    }

    async fn update_external_result(
        &self,
        subject_id: SubjectId,
        external_code: &SkinCode,
    ) -> Result<MergeOutcome, StoreError> {
        self.upsert_with(subject_id, |record| {
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
        .await
    }

    async fn lookup(&self, subject_id: SubjectId) -> Result<Option<PatientSummary>, StoreError> {
        let _guard = self.lock.lock().await;
        let rows = self.read_all().await?;
        Ok(rows
            .iter()
            .find(|r| r.subject_id == subject_id)
            .map(PatientSummary::from_record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MatchPercent;
    use crate::domain::record::Sex;
    use tempfile::tempdir;

    fn new_patient(subject_id: SubjectId) -> NewPatient {
        NewPatient {
            subject_id,
            age: 45,
            sex: Sex::Female,
            allergies: "none".to_string(),
        }
    }

    async fn rows_in(store: &FlatFileRecordStore) -> Vec<PatientRecord> {
        let _guard = store.lock.lock().await;
        store.read_all().await.unwrap()
    }

    #[tokio::test]
    async fn create_then_lookup_returns_demographics_only() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        let id = SubjectId::new();

        store.create(new_patient(id)).await.unwrap();
        let summary = store.lookup(id).await.unwrap().unwrap();

        assert_eq!(summary.age, Some(45));
        assert_eq!(summary.sex, Some(Sex::Female));
        assert_eq!(summary.allergies.as_deref(), Some("none"));
        assert_eq!(summary.final_skin_type, None);
        assert_eq!(summary.season, None);

        let rows = rows_in(&store).await;
        assert!(rows[0].results_empty());
    }

    #[tokio::test]
    async fn lookup_on_missing_file_is_none_not_error() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        assert!(store.lookup(SubjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sequential_updates_never_duplicate_a_row() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        let id = SubjectId::new();

        store.create(new_patient(id)).await.unwrap();
        let code: SkinCode = "ORPT".parse().unwrap();
        store
            .update_quiz_result(id, r#"{"O/D":"A"}"#, &code)
            .await
            .unwrap();
        store.update_season(id, Season::AutumnWinter).await.unwrap();

        let rows = rows_in(&store).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].skin_code, Some(code));
        assert_eq!(rows[0].season, Some(Season::AutumnWinter));
        assert_eq!(rows[0].age, Some(45));
    }

    #[tokio::test]
    async fn update_to_unknown_key_synthesizes_a_row() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        let id = SubjectId::new();

        store.update_season(id, Season::SpringSummer).await.unwrap();

        let rows = rows_in(&store).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].season, Some(Season::SpringSummer));
        assert_eq!(rows[0].age, None);
        assert_eq!(rows[0].allergies, None);
    }

    #[tokio::test]
    async fn external_result_merges_against_stored_code() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        let id = SubjectId::new();

        store.create(new_patient(id)).await.unwrap();
        store
            .update_quiz_result(id, "{}", &"OSPW".parse().unwrap())
            .await
            .unwrap();

        let outcome = store
            .update_external_result(id, &"OSPT".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(outcome.final_code, "OSPT");
        assert_eq!(outcome.match_percent.value(), 75.0);

        let rows = rows_in(&store).await;
        assert_eq!(rows[0].external_skin_code.as_deref(), Some("OSPT"));
        assert_eq!(rows[0].final_skin_type.as_deref(), Some("OSPT"));
        assert_eq!(rows[0].match_percent, Some(MatchPercent::new(75.0)));
    }

    #[tokio::test]
    async fn external_result_without_stored_code_is_zero_match() {
        let dir = tempdir().unwrap();
        let store = FlatFileRecordStore::new(dir.path().join("patients.jsonl"));
        let id = SubjectId::new();

        let outcome = store
            .update_external_result(id, &"DRNT".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(outcome.final_code, "DRNT");
        assert_eq!(outcome.match_percent, MatchPercent::ZERO);
    }

    #[tokio::test]
    async fn corrupt_line_surfaces_with_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patients.jsonl");
        tokio::fs::write(&path, "not json\n").await.unwrap();

        let store = FlatFileRecordStore::new(&path);
        let err = store.lookup(SubjectId::new()).await.unwrap_err();
        match err {
            StoreError::Corrupt { line, .. } => assert_eq!(line, 1),
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn two_stores_on_different_paths_are_independent() {
        let dir = tempdir().unwrap();
        let store_a = FlatFileRecordStore::new(dir.path().join("a.jsonl"));
        let store_b = FlatFileRecordStore::new(dir.path().join("b.jsonl"));
        let id = SubjectId::new();

        store_a.create(new_patient(id)).await.unwrap();

        assert!(store_a.lookup(id).await.unwrap().is_some());
        assert!(store_b.lookup(id).await.unwrap().is_none());
    }
}
