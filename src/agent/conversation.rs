//! Conversation history
//!
//! Append-only for the lifetime of a session. The turn budget is the only
//! bound on its length.

use crate::llm::content::{Content, ROLE_MODEL, ROLE_USER};

#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Content>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn at the end
    pub fn push(&mut self, content: Content) {
        self.turns.push(content);
    }

    /// The whole history, oldest first
    pub fn contents(&self) -> &[Content] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Content> {
        self.turns.last()
    }

    /// Number of turns produced by the model
    pub fn model_turns(&self) -> usize {
        self.turns.iter().filter(|c| c.role == ROLE_MODEL).count()
    }

    /// Number of turns produced on the user side (goal and observations)
    pub fn user_turns(&self) -> usize {
        self.turns.iter().filter(|c| c.role == ROLE_USER).count()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
