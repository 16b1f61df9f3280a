//! Domain layer: the questionnaire, scoring, records, and conversations.

pub mod conversation;
pub mod foundation;
pub mod quiz;
pub mod record;
