//! PostgreSQL implementation of RecordStore.
//!
//! Alternate persistence backend with the same contract as the flat-file
//! store: one row per subject, defensive upserts via `ON CONFLICT`, and the
//! external-result reconciliation performed as a single transaction with the
//! target row locked.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::{merge, MergeOutcome, Season, SkinCode};
use crate::domain::record::{PatientSummary, Sex};
use crate::ports::{NewPatient, RecordStore, StoreError};

/// Record store over a `patients` table.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `patients` table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                subject_id UUID PRIMARY KEY,
                age INT,
                sex CHAR(1),
                allergies TEXT,
                answers_json TEXT,
                skin_code VARCHAR(4),
                external_skin_code VARCHAR(4),
                match_percent DOUBLE PRECISION,
                final_skin_type VARCHAR(4),
                season TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;

        debug!("patients table ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn create(&self, patient: NewPatient) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO patients (subject_id, age, sex, allergies)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(patient.subject_id.as_uuid())
        .bind(i32::from(patient.age))
        .bind(patient.sex.token())
        .bind(&patient.allergies)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;
        Ok(())
    }

    async fn update_quiz_result(
        &self,
        subject_id: SubjectId,
        answers_json: &str,
        skin_code: &SkinCode,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO patients (subject_id, answers_json, skin_code)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject_id) DO UPDATE
            SET answers_json = EXCLUDED.answers_json,
                skin_code = EXCLUDED.skin_code
            "#,
        )
        .bind(subject_id.as_uuid())
        .bind(answers_json)
        .bind(skin_code.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;
        Ok(())
    }

    async fn update_season(&self, subject_id: SubjectId, season: Season) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO patients (subject_id, season)
            VALUES ($1, $2)
            ON CONFLICT (subject_id) DO UPDATE
            SET season = EXCLUDED.season
            "#,
        )
        .bind(subject_id.as_uuid())
        .bind(season.token())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;
        Ok(())
    }

    async fn update_external_result(
        &self,
        subject_id: SubjectId,
        external_code: &SkinCode,
    ) -> Result<MergeOutcome, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::database(e.to_string()))?;

        let row = sqlx::query(
            r#"
            SELECT skin_code FROM patients WHERE subject_id = $1 FOR UPDATE
            "#,
        )
        .bind(subject_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;

        let stored: String = row
            .and_then(|r| r.get::<Option<String>, _>("skin_code"))
            .unwrap_or_default();
        let outcome = merge(&stored, external_code.as_str());

        sqlx::query(
            r#"
            INSERT INTO patients
                (subject_id, external_skin_code, match_percent, final_skin_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject_id) DO UPDATE
            SET external_skin_code = EXCLUDED.external_skin_code,
                match_percent = EXCLUDED.match_percent,
                final_skin_type = EXCLUDED.final_skin_type
            "#,
        )
        .bind(subject_id.as_uuid())
        .bind(external_code.as_str())
        .bind(outcome.match_percent.value())
        .bind(&outcome.final_code)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::database(e.to_string()))?;
        Ok(outcome)
    }

    async fn lookup(&self, subject_id: SubjectId) -> Result<Option<PatientSummary>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT age, sex, allergies, final_skin_type, season
            FROM patients WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let age: Option<i32> = row.get("age");
        let sex: Option<String> = row.get("sex");
        let sex = sex
            .map(|s| {
                s.trim()
                    .parse::<Sex>()
                    .map_err(|e| StoreError::database(format!("bad sex column: {}", e)))
            })
            .transpose()?;
        let season: Option<String> = row.get("season");
        let season = season
            .map(|s| {
                s.parse::<Season>()
                    .map_err(|e| StoreError::database(format!("bad season column: {}", e)))
            })
            .transpose()?;

        Ok(Some(PatientSummary {
            age: age.map(|a| a.clamp(0, 120) as u8),
            sex,
            allergies: row.get("allergies"),
            final_skin_type: row.get("final_skin_type"),
            season,
        }))
    }
}
