//! Chat request/response types
//!
//! These types model a role-tagged chat transcript as accepted by local
//! chat-completion endpoints.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        write!(f, "{}", name)
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        debug!("Message::system: called");
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        debug!("Message::assistant: called");
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// A chat request - the full transcript for one model turn
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Reduced result of one streamed chat completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatResponse {
    /// Concatenated `message.content` fragments, in arrival order
    pub content: String,

    /// Whether a line reported `done: true` (false when the stream just ended)
    pub done_seen: bool,

    /// Number of lines decoded successfully
    pub chunk_count: usize,

    /// Number of lines that failed to decode and were skipped
    pub skipped_lines: usize,

    /// Token counts reported on the final line, if any
    pub usage: TokenUsage,
}

/// Token counts reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Streaming chunk for live progress display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Text being generated
    TextDelta(String),

    /// A line that could not be decoded
    Skipped { line: String },

    /// Completion marker seen
    Done { usage: TokenUsage },
}
