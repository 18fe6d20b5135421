//! Contract between the hub and its assistant panel. The assistant itself is
//! a hosted text-generation service; the hub only sends text and shows the
//! reply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Shown in place of a reply whenever the round trip fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach the assistant right now. Please try again in a moment.";

/// Longest message the proxy accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Body of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let len = self.message.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(ChatError::TooLong(len));
        }
        Ok(())
    }
}

/// Successful response of `POST /api/v1/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    EmptyMessage,
    TooLong(usize),
    Network(String),
    Status(u16),
    Parse(String),
    /// The service answered with no text.
    EmptyReply,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message is empty"),
            Self::TooLong(len) => {
                write!(f, "message is {len} characters (max {MAX_MESSAGE_CHARS})")
            },
            Self::Network(e) => write!(f, "chat request failed: {e}"),
            Self::Status(code) => write!(f, "chat service returned HTTP {code}"),
            Self::Parse(e) => write!(f, "chat reply unreadable: {e}"),
            Self::EmptyReply => write!(f, "chat service returned no text"),
        }
    }
}

impl std::error::Error for ChatError {}

/// Tell the assistant what it is and which games exist.
pub fn build_system_prompt(site_name: &str, catalog: Option<&Catalog>) -> String {
    let mut prompt = format!(
        "You are the friendly assistant of {site_name}, a website of free browser games. \
         Keep answers short and help visitors pick something to play."
    );
    match catalog {
        Some(catalog) if !catalog.is_empty() => {
            prompt.push_str(" The games currently available are: ");
            prompt.push_str(&catalog.titles().collect::<Vec<_>>().join(", "));
            prompt.push('.');
        },
        _ => prompt.push_str(" The game list is currently unavailable."),
    }
    prompt
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    /// The fallback message after a failed round trip.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

/// Messages shown in the chat panel. One request is in flight at a time.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    entries: Vec<ChatEntry>,
    pending: bool,
}

impl ChatTranscript {
    /// Record the user's message. Returns the text to send, or `None` when the
    /// input is blank or a reply is still pending.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return None;
        }
        self.entries.push(ChatEntry {
            role: ChatRole::User,
            text: text.to_string(),
        });
        self.pending = true;
        Some(text.to_string())
    }

    /// Record the outcome of the round trip started by [`submit`](Self::submit).
    pub fn resolve(&mut self, result: Result<String, ChatError>) {
        self.pending = false;
        let entry = match result {
            Ok(reply) if !reply.trim().is_empty() => ChatEntry {
                role: ChatRole::Assistant,
                text: reply,
            },
            Ok(_) => {
                tracing::warn!(error = %ChatError::EmptyReply, "chat failed");
                fallback_entry()
            },
            Err(e) => {
                tracing::warn!(error = %e, "chat failed");
                fallback_entry()
            },
        };
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

fn fallback_entry() -> ChatEntry {
    ChatEntry {
        role: ChatRole::Error,
        text: FALLBACK_REPLY.to_string(),
    }
}
