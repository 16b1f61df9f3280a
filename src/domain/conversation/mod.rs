//! Conversation state machine and engine.

mod engine;
mod event;
mod state;

pub use engine::{Conversation, ConversationEngine, EngineError};
pub use event::{ChoiceOption, InboundEvent, Outbound};
pub use state::ConversationState;
