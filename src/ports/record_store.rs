//! RecordStore port for durable per-subject records.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::{MergeOutcome, Season, SkinCode};
use crate::domain::record::{PatientSummary, Sex};

/// Demographics captured before the quiz starts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub subject_id: SubjectId,
    pub age: u8,
    pub sex: Sex,
    pub allergies: String,
}

/// Failures raised by a record store backend.
///
/// None of these are recoverable by the store itself; callers report a
/// generic failure and leave the conversation state untouched so the turn
/// can be retried.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying file could not be read or written.
    #[error("Record store IO error: {message}")]
    Io { message: String },

    /// The record set could not be parsed.
    #[error("Corrupt record set at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    /// Relational backend failure.
    #[error("Database error: {message}")]
    Database { message: String },
}

impl StoreError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into() }
    }

    /// Creates a corrupt record set error.
    pub fn corrupt(line: usize, message: impl Into<String>) -> Self {
        Self::Corrupt {
            line,
            message: message.into(),
        }
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database { message: message.into() }
    }
}

/// Keyed access to the durable record set.
///
/// Every mutation is one atomic read-modify-write over the whole record set,
/// serialized against all other operations by the implementation's own lock.
/// Updates that target an unknown key synthesize a fresh row with empty
/// non-supplied fields instead of failing (defensive upsert); key uniqueness
/// on `create` is the caller's guarantee (freshly minted `SubjectId`).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends a new row holding only demographics; result fields empty.
    async fn create(&self, patient: NewPatient) -> Result<(), StoreError>;

    /// Writes the answers snapshot and quiz-derived code onto the row.
    async fn update_quiz_result(
        &self,
        subject_id: SubjectId,
        answers_json: &str,
        skin_code: &SkinCode,
    ) -> Result<(), StoreError>;

    /// Writes the selected season onto the row.
    async fn update_season(&self, subject_id: SubjectId, season: Season) -> Result<(), StoreError>;

    /// Reconciles the externally supplied code against the stored quiz code
    /// and writes `external_skin_code`, `match_percent` and
    /// `final_skin_type` in the same locked read-modify-write, returning the
    /// outcome. A missing row merges against an empty quiz code.
    async fn update_external_result(
        &self,
        subject_id: SubjectId,
        external_code: &SkinCode,
    ) -> Result<MergeOutcome, StoreError>;

    /// Projects the downstream summary for one subject; `None` if absent.
    async fn lookup(&self, subject_id: SubjectId) -> Result<Option<PatientSummary>, StoreError>;
}
