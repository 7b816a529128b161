//! Ordered conversation history owned by a chat session.

use serde::Serialize;

use crate::agent::message::{ChatMessage, Role, assistant_message, user_message};

/// Append-only sequence of chat turns.
///
/// Turns are kept in the order they were pushed. The only way to remove
/// anything is [`Conversation::clear`], which empties the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates an empty conversation.
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Appends a user turn.
    pub fn push_user(&mut self, content: &str) {
        self.turns.push(user_message(content));
    }

    /// Appends an assistant turn.
    pub fn push_assistant(&mut self, content: &str) {
        self.turns.push(assistant_message(content));
    }

    /// Empties the history.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turns have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Content of the most recent user turn, if any.
    #[must_use]
    pub fn last_user_content(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}
