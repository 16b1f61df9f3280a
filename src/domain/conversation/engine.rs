//! The per-subject conversation engine.
//!
//! One engine serves many conversations; each [`Conversation`] is owned by a
//! single session task and advanced one inbound event at a time. The engine
//! never mutates conversation state until every store call for the turn has
//! succeeded, so a failed write leaves the turn retryable.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::SubjectId;
use crate::domain::quiz::{
    classify, AnswerLog, Choice, ClassifyError, MergeOutcome, QuestionBank, ScoringMode, Season,
    SkinCode,
};
use crate::domain::record::{summary_json, Sex};
use crate::ports::{NewPatient, RecordStore, StoreError};

use super::event::{ChoiceOption, InboundEvent, Outbound};
use super::state::ConversationState;

/// Failures the engine surfaces to its caller.
///
/// Input-validation problems never appear here; those are answered with a
/// re-prompt and the state stays put.
#[derive(Debug, Error)]
pub enum EngineError {
    /// External merge requested for a subject that was never created.
    #[error("No record exists for subject {0}")]
    UnknownSubject(SubjectId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// One subject's conversation, exclusively owned by its session task.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    state: ConversationState,
}

impl Conversation {
    /// Creates a conversation that has not yet been opened.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, for inspection and logging.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }
}

/// Drives conversations over a question bank and a record store.
pub struct ConversationEngine {
    store: Arc<dyn RecordStore>,
    bank: &'static QuestionBank,
    scoring: ScoringMode,
}

impl ConversationEngine {
    /// Creates an engine over the standard question bank with the default
    /// scoring mode.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            bank: QuestionBank::standard(),
            scoring: ScoringMode::default(),
        }
    }

    /// Replaces the question bank (tests use short banks).
    pub fn with_bank(mut self, bank: &'static QuestionBank) -> Self {
        self.bank = bank;
        self
    }

    /// Replaces the scoring mode.
    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    /// Opens a conversation: emits the consent prompt.
    pub fn open(&self) -> (Conversation, Vec<Outbound>) {
        let conversation = Conversation {
            state: ConversationState::AwaitingConsent,
        };
        (conversation, vec![consent_prompt()])
    }

    /// Advances a conversation by one inbound event.
    ///
    /// Unrecognized or malformed input re-prompts without changing state.
    /// Store failures propagate with the state unchanged so the same turn
    /// can be retried.
    pub async fn handle(
        &self,
        conversation: &mut Conversation,
        event: InboundEvent,
    ) -> Result<Vec<Outbound>, EngineError> {
        let (next, replies) = self.step(&conversation.state, event).await?;
        if let Some(next) = next {
            info!(from = conversation.state.name(), to = next.name(), "conversation advanced");
            conversation.state = next;
        }
        Ok(replies)
    }

    /// Reconciles an externally supplied imaging code for a subject.
    ///
    /// Independent of any live session: it may arrive long after the
    /// conversation finished. Fails fast if the subject was never created
    /// rather than writing a partial record.
    pub async fn record_external_result(
        &self,
        subject_id: SubjectId,
        external_code: &SkinCode,
    ) -> Result<MergeOutcome, EngineError> {
        if self.store.lookup(subject_id).await?.is_none() {
            return Err(EngineError::UnknownSubject(subject_id));
        }
        let outcome = self
            .store
            .update_external_result(subject_id, external_code)
            .await?;
        info!(
            subject = %subject_id,
            final_type = %outcome.final_code,
            match_percent = outcome.match_percent.value(),
            "external result reconciled"
        );
        Ok(outcome)
    }

    /// Downstream handoff projection for a subject; `{}` when absent.
    pub async fn patient_summary_json(&self, subject_id: SubjectId) -> Result<String, EngineError> {
        let summary = self.store.lookup(subject_id).await?;
        Ok(summary_json(summary.as_ref()))
    }

    /// Computes one transition. Returns the next state (or `None` to stay)
    /// and the replies to render.
    async fn step(
        &self,
        state: &ConversationState,
        event: InboundEvent,
    ) -> Result<(Option<ConversationState>, Vec<Outbound>), EngineError> {
        use ConversationState::*;

        match state {
            Start => Ok((Some(AwaitingConsent), vec![consent_prompt()])),

            AwaitingConsent => match event {
                InboundEvent::Consent(true) => Ok((Some(AwaitingSex), vec![sex_prompt()])),
                InboundEvent::Consent(false) => Ok((
                    Some(Declined),
                    vec![Outbound::final_text(
                        "Assessment cancelled. Nothing was stored.",
                    )],
                )),
                other => {
                    warn!(state = state.name(), ?other, "unexpected event, re-prompting");
                    Ok((None, vec![consent_prompt()]))
                }
            },

            AwaitingSex => match event {
                InboundEvent::Choice(token) => match token.parse::<Sex>() {
                    Ok(sex) => Ok((Some(AwaitingAge { sex }), vec![age_prompt()])),
                    Err(_) => {
                        warn!(%token, "unrecognized sex token");
                        Ok((None, vec![sex_prompt()]))
                    }
                },
                _ => Ok((None, vec![sex_prompt()])),
            },

            AwaitingAge { sex } => match event {
                InboundEvent::Text(text) => match parse_age(&text) {
                    Some(age) => Ok((
                        Some(AwaitingAllergies { sex: *sex, age }),
                        vec![allergies_prompt()],
                    )),
                    None => {
                        warn!(input = %text.trim(), "rejected age input");
                        Ok((
                            None,
                            vec![Outbound::ask(
                                "Please enter your age as a whole number between 0 and 120.",
                            )],
                        ))
                    }
                },
                _ => Ok((None, vec![age_prompt()])),
            },

            AwaitingAllergies { sex, age } => match event {
                InboundEvent::Text(text) => {
                    let trimmed = text.trim();
                    let allergies = if trimmed.is_empty() { "none" } else { trimmed };

                    // The single point that mints the subject id and creates
                    // the durable record, strictly before any quiz answer.
                    let subject_id = SubjectId::new();
                    self.store
                        .create(NewPatient {
                            subject_id,
                            age: *age,
                            sex: *sex,
                            allergies: allergies.to_string(),
                        })
                        .await?;
                    info!(subject = %subject_id, "patient record created");

                    self.quiz_turn(subject_id, AnswerLog::new(), 0).await
                }
                _ => Ok((None, vec![allergies_prompt()])),
            },

            InQuiz {
                subject_id,
                answers,
                current_question,
            } => match event {
                InboundEvent::Choice(token) => {
                    let question = match self.bank.question(*current_question) {
                        Some(question) => question,
                        // Index ran past the bank; settle the quiz as-is.
                        None => {
                            return self
                                .quiz_turn(*subject_id, answers.clone(), *current_question)
                                .await
                        }
                    };
                    match token.parse::<Choice>() {
                        Ok(choice) => {
                            let mut answers = answers.clone();
                            answers.record(question.category, choice);
                            self.quiz_turn(*subject_id, answers, current_question + 1)
                                .await
                        }
                        Err(_) => {
                            warn!(%token, "rejected quiz choice");
                            Ok((
                                None,
                                vec![question_prompt(question, *current_question, self.bank.len())],
                            ))
                        }
                    }
                }
                _ => {
                    let replies = match self.bank.question(*current_question) {
                        Some(question) => {
                            vec![question_prompt(question, *current_question, self.bank.len())]
                        }
                        None => Vec::new(),
                    };
                    Ok((None, replies))
                }
            },

            AwaitingSeason { subject_id } => match event {
                InboundEvent::Choice(token) => match token.parse::<Season>() {
                    Ok(season) => {
                        self.store.update_season(*subject_id, season).await?;
                        info!(subject = %subject_id, season = %season, "season recorded");
                        Ok((
                            Some(PhotoPending {
                                subject_id: *subject_id,
                            }),
                            vec![Outbound::ask(
                                "Noted. When your dermatoscopy result is ready, send the \
                                 4-letter code here to get your final verdict.",
                            )],
                        ))
                    }
                    Err(_) => {
                        warn!(%token, "unrecognized season token");
                        Ok((None, vec![season_prompt()]))
                    }
                },
                _ => Ok((None, vec![season_prompt()])),
            },

            PhotoPending { subject_id } => match event {
                InboundEvent::Text(text) => match SkinCode::try_new(&text) {
                    Ok(external) => {
                        let outcome = self.record_external_result(*subject_id, &external).await?;
                        Ok((
                            Some(CarePending {
                                subject_id: *subject_id,
                            }),
                            vec![Outbound::final_text(format!(
                                "Final skin type: {} (quiz and imaging agree on {}% of axes).",
                                outcome.final_code,
                                outcome.match_percent.value()
                            ))],
                        ))
                    }
                    Err(_) => Ok((
                        None,
                        vec![Outbound::ask(
                            "That doesn't look like a 4-letter skin code. Please re-send it.",
                        )],
                    )),
                },
                _ => Ok((
                    None,
                    vec![Outbound::ask(
                        "Awaiting your dermatoscopy code (4 letters).",
                    )],
                )),
            },

            Declined | CarePending { .. } => Ok((
                None,
                vec![Outbound::final_text("This conversation has ended.")],
            )),
        }
    }

    /// Presents question `index`, or settles the quiz when the bank is
    /// exhausted: classify, persist, and move on to the season question.
    async fn quiz_turn(
        &self,
        subject_id: SubjectId,
        answers: AnswerLog,
        index: usize,
    ) -> Result<(Option<ConversationState>, Vec<Outbound>), EngineError> {
        if let Some(question) = self.bank.question(index) {
            let prompt = question_prompt(question, index, self.bank.len());
            return Ok((
                Some(ConversationState::InQuiz {
                    subject_id,
                    answers,
                    current_question: index,
                }),
                vec![prompt],
            ));
        }

        let code = classify(&answers, self.scoring)?;
        let snapshot = answers.snapshot().to_string();
        self.store
            .update_quiz_result(subject_id, &snapshot, &code)
            .await?;
        info!(subject = %subject_id, code = %code, "quiz classified");

        Ok((
            Some(ConversationState::AwaitingSeason { subject_id }),
            vec![
                Outbound::final_text(format!(
                    "Assessment complete!\n\nYour skin type: {}\n{}",
                    code,
                    code.describe()
                )),
                season_prompt(),
            ],
        ))
    }
}

fn parse_age(text: &str) -> Option<u8> {
    let age: i64 = text.trim().parse().ok()?;
    if (0..=120).contains(&age) {
        Some(age as u8)
    } else {
        None
    }
}

fn consent_prompt() -> Outbound {
    Outbound::prompt(
        "We collect anonymous data to assess your skin type. Do you agree to take part?",
        vec![
            ChoiceOption::new("yes", "Yes"),
            ChoiceOption::new("no", "No"),
        ],
    )
}

fn sex_prompt() -> Outbound {
    Outbound::prompt(
        "Please select your sex:",
        vec![
            ChoiceOption::new(Sex::Male.token(), "Male"),
            ChoiceOption::new(Sex::Female.token(), "Female"),
        ],
    )
}

fn age_prompt() -> Outbound {
    Outbound::ask("Please enter your age:")
}

fn allergies_prompt() -> Outbound {
    Outbound::ask("List any allergies (leave blank for none):")
}

fn question_prompt(
    question: &crate::domain::quiz::Question,
    index: usize,
    total: usize,
) -> Outbound {
    let mut text = format!("({}/{}) {}", index + 1, total, question.prompt);
    if let Some(note) = question.note {
        text.push('\n');
        text.push_str(note);
    }
    text.push_str("\n\nChoose an option:");
    Outbound::prompt(
        text,
        vec![
            ChoiceOption::new("A", question.option_a),
            ChoiceOption::new("B", question.option_b),
        ],
    )
}

fn season_prompt() -> Outbound {
    Outbound::prompt(
        "Which season are you planning care for?",
        vec![
            ChoiceOption::new(Season::AutumnWinter.token(), Season::AutumnWinter.label()),
            ChoiceOption::new(Season::SpringSummer.token(), Season::SpringSummer.label()),
        ],
    )
}
