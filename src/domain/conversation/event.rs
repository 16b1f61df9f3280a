//! Event surface between the engine and the front-end transport.
//!
//! The transport (chat UI, console, test driver) owns rendering and input
//! capture; the engine only ever sees these events and replies.

use serde::{Deserialize, Serialize};

/// Input event delivered by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum InboundEvent {
    /// Consent decision (yes/no button).
    Consent(bool),

    /// One of the offered option tokens, verbatim.
    Choice(String),

    /// Free text.
    Text(String),
}

/// A selectable option offered with a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Literal token the front end must echo back in a `Choice` event.
    pub token: String,

    /// Human-readable label to render.
    pub label: String,
}

impl ChoiceOption {
    /// Creates an option.
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Outbound message for the front end to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Outbound {
    /// A question awaiting input; `options` is empty for free-text prompts.
    Prompt {
        text: String,
        options: Vec<ChoiceOption>,
    },

    /// A statement that expects no reply.
    FinalText { text: String },
}

impl Outbound {
    /// Creates a prompt with options.
    pub fn prompt(text: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self::Prompt {
            text: text.into(),
            options,
        }
    }

    /// Creates a free-text prompt.
    pub fn ask(text: impl Into<String>) -> Self {
        Self::Prompt {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// Creates a final statement.
    pub fn final_text(text: impl Into<String>) -> Self {
        Self::FinalText { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_events_serialize_with_tags() {
        let json = serde_json::to_string(&InboundEvent::Consent(true)).unwrap();
        assert_eq!(json, r#"{"kind":"consent","value":true}"#);

        let json = serde_json::to_string(&InboundEvent::Choice("A".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"choice","value":"A"}"#);
    }

    #[test]
    fn ask_has_no_options() {
        match Outbound::ask("Your age?") {
            Outbound::Prompt { options, .. } => assert!(options.is_empty()),
            _ => panic!("expected prompt"),
        }
    }
}
