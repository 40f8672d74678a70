//! Conversation transcript and planning sessions

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::llm::{ChatRequest, Message};

/// Opening system message of every transcript
pub const SYSTEM_PROMPT: &str = "You are a helpful academic advisor.";

/// Append-only, ordered chat transcript
///
/// Starts with exactly one system message. Entries are never edited, removed
/// or reordered; the whole transcript is sent on every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        debug!("Conversation::new: called");
        Self {
            messages: vec![Message::system(SYSTEM_PROMPT)],
        }
    }

    /// Append one turn's messages, in order
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        let before = self.messages.len();
        self.messages.extend(messages);
        debug!(before, after = self.messages.len(), "Conversation::extend: called");
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true; the system message is always present
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Snapshot the full transcript as a request
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest::new(self.messages.clone())
    }
}

/// One student's planning context
///
/// Owns the transcript that accumulates across plan requests. Created and
/// reset explicitly by whoever serves the student.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    conversation: Conversation,
    turns: u32,
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanningSession {
    pub fn new() -> Self {
        let session = Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            conversation: Conversation::new(),
            turns: 0,
        };
        debug!(id = %session.id, "PlanningSession::new: called");
        session
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Plan requests assembled into this session so far
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub(crate) fn append_turn(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.conversation.extend(messages);
        self.turns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_new_conversation_has_one_system_message() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        assert!(!conversation.is_empty());
        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.messages()[0].content, SYSTEM_PROMPT);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.extend([Message::assistant("a"), Message::user("b")]);
        conversation.extend([Message::user("c")]);
        let contents: Vec<_> = conversation.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![SYSTEM_PROMPT, "a", "b", "c"]);
        assert_eq!(conversation.to_request().messages.len(), 4);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut first = PlanningSession::new();
        let second = PlanningSession::new();
        assert_ne!(first.id, second.id);

        first.append_turn([Message::user("x")]);
        assert_eq!(first.turns(), 1);
        assert_eq!(first.conversation().len(), 2);
        assert_eq!(second.conversation().len(), 1);
        assert_eq!(second.turns(), 0);
    }
}
