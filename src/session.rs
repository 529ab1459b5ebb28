//! Caller-owned conversation history.

use crate::agent::Agent;
use crate::error::AgentError;
use crate::llm::ChatMessage;

/// Ordered user/assistant history for one conversation.
///
/// Only final messages are kept: tool traffic from inside a turn stays in the
/// agent loop and the invocation log. `submit` takes `&mut self`, so a second
/// turn cannot start on the same session before the first one finishes.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Run one turn. On success the user message and the reply are appended;
    /// on failure the history is left untouched.
    pub async fn submit(&mut self, agent: &Agent, text: &str) -> Result<&ChatMessage, AgentError> {
        let reply = agent.process_turn(&self.messages, text).await?;
        self.messages.push(ChatMessage::user(text));
        self.messages.push(reply);
        Ok(&self.messages[self.messages.len() - 1])
    }
}
