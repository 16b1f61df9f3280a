//! The Baumann questionnaire: questions, recorded answers, and scoring.

mod answers;
mod category;
mod classifier;
mod question;
mod season;

pub use answers::{AnswerLog, ScoringMode};
pub use category::{Category, Choice};
pub use classifier::{classify, merge, ClassifyError, MergeOutcome, SkinCode};
pub use question::{Question, QuestionBank};
pub use season::Season;
