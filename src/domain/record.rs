//! The durable per-subject record and its downstream projection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{MatchPercent, SubjectId, ValidationError};
use crate::domain::quiz::{Season, SkinCode};

/// Subject's reported sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// The literal token the front end sends.
    pub fn token(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(ValidationError::unknown_token(other)),
        }
    }
}

/// One durable row per subject, keyed by `subject_id`.
///
/// Field order is the persisted column order and must not change. A record
/// is created at demographics completion with every result field empty, then
/// mutated in place by quiz completion, season selection, and external-code
/// arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub subject_id: SubjectId,
    pub age: Option<u8>,
    pub sex: Option<Sex>,
    pub allergies: Option<String>,
    /// JSON object mapping each category key to the latest choice.
    pub answers_json: Option<String>,
    pub skin_code: Option<SkinCode>,
    pub external_skin_code: Option<String>,
    pub match_percent: Option<MatchPercent>,
    pub final_skin_type: Option<String>,
    pub season: Option<Season>,
}

impl PatientRecord {
    /// A row with every field beyond the key empty. Updates that target an
    /// unknown key start from this and fill in what they were given.
    pub fn empty(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            age: None,
            sex: None,
            allergies: None,
            answers_json: None,
            skin_code: None,
            external_skin_code: None,
            match_percent: None,
            final_skin_type: None,
            season: None,
        }
    }

    /// True if no result field has been written yet.
    pub fn results_empty(&self) -> bool {
        self.answers_json.is_none()
            && self.skin_code.is_none()
            && self.external_skin_code.is_none()
            && self.match_percent.is_none()
            && self.final_skin_type.is_none()
            && self.season.is_none()
    }
}

/// Fixed projection handed to the downstream recommendation consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub age: Option<u8>,
    pub sex: Option<Sex>,
    pub allergies: Option<String>,
    pub final_skin_type: Option<String>,
    pub season: Option<Season>,
}

impl PatientSummary {
    /// Projects the summary fields out of a full record.
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            age: record.age,
            sex: record.sex,
            allergies: record.allergies.clone(),
            final_skin_type: record.final_skin_type.clone(),
            season: record.season,
        }
    }
}

/// Renders a lookup result for the downstream consumer: the summary object,
/// or `{}` when no record exists (an empty-object sentinel, not an error).
pub fn summary_json(summary: Option<&PatientSummary>) -> String {
    match summary {
        // Serializing a plain struct of scalars cannot fail.
        Some(summary) => serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string()),
        None => "{}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_results() {
        let record = PatientRecord::empty(SubjectId::new());
        assert!(record.results_empty());
        assert!(record.age.is_none());
    }

    #[test]
    fn summary_projects_exactly_five_fields() {
        let mut record = PatientRecord::empty(SubjectId::new());
        record.age = Some(45);
        record.sex = Some(Sex::Female);
        record.allergies = Some("none".to_string());
        record.final_skin_type = Some("OSPT".to_string());
        record.season = Some(Season::SpringSummer);

        let summary = PatientSummary::from_record(&record);
        let value: serde_json::Value =
            serde_json::from_str(&summary_json(Some(&summary))).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["age"], 45);
        assert_eq!(object["sex"], "F");
        assert_eq!(object["final_skin_type"], "OSPT");
        assert_eq!(object["season"], "spring_summer");
    }

    #[test]
    fn absent_record_projects_empty_object() {
        assert_eq!(summary_json(None), "{}");
    }

    #[test]
    fn sex_tokens_round_trip() {
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("m".parse::<Sex>().is_err());
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut record = PatientRecord::empty(SubjectId::new());
        record.age = Some(30);
        record.skin_code = Some("ORPT".parse().unwrap());

        let line = serde_json::to_string(&record).unwrap();
        let back: PatientRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, record);
    }
}
