//! Console front end.
//!
//! Stands in for the chat transport: renders prompts and options on stdout
//! and turns stdin lines back into inbound events. The engine never sees the
//! terminal; it only sees the event surface.

use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::domain::conversation::{
    ChoiceOption, Conversation, ConversationEngine, InboundEvent, Outbound,
};

/// Interactive stdin/stdout driver for a single conversation.
pub struct ConsoleFrontEnd {
    engine: ConversationEngine,
}

impl ConsoleFrontEnd {
    /// Creates a console front end over an engine.
    pub fn new(engine: ConversationEngine) -> Self {
        Self { engine }
    }

    /// Runs one conversation to a terminal state.
    pub async fn run(&self) -> io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        let (mut conversation, replies) = self.engine.open();
        let mut offered = render(&replies);

        while !conversation.state().is_terminal() {
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let event = to_event(line.trim(), &offered);

            match self.engine.handle(&mut conversation, event).await {
                Ok(replies) => offered = render(&replies),
                Err(e) => {
                    // Scoped to this turn; the state is unchanged and the
                    // subject may simply try again.
                    eprintln!("Something went wrong, please try again. ({})", e);
                }
            }
        }

        Ok(())
    }
}

/// Maps a raw input line to an event, given the options last offered.
fn to_event(input: &str, offered: &[ChoiceOption]) -> InboundEvent {
    match input {
        "yes" if has_token(offered, "yes") => InboundEvent::Consent(true),
        "no" if has_token(offered, "no") => InboundEvent::Consent(false),
        // Any input while options are on offer goes out as a choice; the
        // engine rejects unknown tokens and re-prompts.
        _ if !offered.is_empty() => InboundEvent::Choice(input.to_string()),
        _ => InboundEvent::Text(input.to_string()),
    }
}

fn has_token(offered: &[ChoiceOption], token: &str) -> bool {
    offered.iter().any(|o| o.token == token)
}

/// Prints replies and returns the options now on offer.
fn render(replies: &[Outbound]) -> Vec<ChoiceOption> {
    let mut offered = Vec::new();
    for reply in replies {
        match reply {
            Outbound::Prompt { text, options } => {
                println!("\n{}", text);
                for option in options {
                    println!("  [{}] {}", option.token, option.label);
                }
                offered = options.clone();
            }
            Outbound::FinalText { text } => {
                println!("\n{}", text);
            }
        }
    }
    offered
}
