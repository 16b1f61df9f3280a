//! Conversation lifecycle as an explicit tagged union.
//!
//! Each variant carries only the payload meaningful in that state: the
//! question index exists only while the quiz runs, the subject id only once
//! demographics have been persisted. Transitions happen exclusively inside
//! the engine, and only after any store call for the turn has succeeded.

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::AnswerLog;
use crate::domain::record::Sex;

/// Where a conversation currently is.
///
/// Required order:
/// `Start → AwaitingConsent → {Declined | AwaitingSex → AwaitingAge →
/// AwaitingAllergies → InQuiz → AwaitingSeason → PhotoPending →
/// CarePending}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// Nothing sent yet.
    Start,

    /// Consent question shown, awaiting yes/no.
    AwaitingConsent,

    /// Subject declined; terminal, no record exists.
    Declined,

    /// Awaiting the sex token.
    AwaitingSex,

    /// Awaiting a parseable age in [0, 120].
    AwaitingAge { sex: Sex },

    /// Awaiting free-text allergies; completion mints the subject id and
    /// creates the durable record.
    AwaitingAllergies { sex: Sex, age: u8 },

    /// Quiz in progress at `current_question`.
    InQuiz {
        subject_id: SubjectId,
        answers: AnswerLog,
        current_question: usize,
    },

    /// Quiz scored and persisted, awaiting the season token.
    AwaitingSeason { subject_id: SubjectId },

    /// Conversation phase done; the external imaging code may now arrive,
    /// either through this session or as an independent trigger.
    PhotoPending { subject_id: SubjectId },

    /// External result reconciled; terminal.
    CarePending { subject_id: SubjectId },
}

impl ConversationState {
    /// True if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::CarePending { .. })
    }

    /// The subject id, once one has been minted.
    pub fn subject_id(&self) -> Option<SubjectId> {
        match self {
            Self::InQuiz { subject_id, .. }
            | Self::AwaitingSeason { subject_id }
            | Self::PhotoPending { subject_id }
            | Self::CarePending { subject_id } => Some(*subject_id),
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AwaitingConsent => "awaiting_consent",
            Self::Declined => "declined",
            Self::AwaitingSex => "awaiting_sex",
            Self::AwaitingAge { .. } => "awaiting_age",
            Self::AwaitingAllergies { .. } => "awaiting_allergies",
            Self::InQuiz { .. } => "in_quiz",
            Self::AwaitingSeason { .. } => "awaiting_season",
            Self::PhotoPending { .. } => "photo_pending",
            Self::CarePending { .. } => "care_pending",
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::Start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_declined_and_care_pending_are_terminal() {
        assert!(ConversationState::Declined.is_terminal());
        assert!(ConversationState::CarePending {
            subject_id: SubjectId::new()
        }
        .is_terminal());

        assert!(!ConversationState::Start.is_terminal());
        assert!(!ConversationState::AwaitingConsent.is_terminal());
        assert!(!ConversationState::AwaitingSex.is_terminal());
        assert!(!ConversationState::PhotoPending {
            subject_id: SubjectId::new()
        }
        .is_terminal());
    }

    #[test]
    fn subject_id_absent_before_allergies_complete() {
        assert_eq!(ConversationState::Start.subject_id(), None);
        assert_eq!(ConversationState::AwaitingConsent.subject_id(), None);
        assert_eq!(ConversationState::AwaitingSex.subject_id(), None);
        assert_eq!(
            ConversationState::AwaitingAge { sex: Sex::Female }.subject_id(),
            None
        );
    }

    #[test]
    fn subject_id_present_from_quiz_onward() {
        let id = SubjectId::new();
        let state = ConversationState::InQuiz {
            subject_id: id,
            answers: AnswerLog::new(),
            current_question: 0,
        };
        assert_eq!(state.subject_id(), Some(id));
        assert_eq!(
            ConversationState::PhotoPending { subject_id: id }.subject_id(),
            Some(id)
        );
    }
}
