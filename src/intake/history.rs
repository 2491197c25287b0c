//! Rolling conversation history passed to the model as context.

use std::collections::VecDeque;

use crate::llm::ChatMessage;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Bounded history of user/assistant turns. Oldest entries fall off first.
///
/// Only context for the model: nothing in the intake logic reads it.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl ConversationHistory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_messages),
            max_messages,
        }
    }

    /// Add a message, trimming the oldest ones beyond the limit.
    pub fn add(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }

    /// Record one completed exchange.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) {
        self.add(ChatMessage::user(user));
        self.add(ChatMessage::assistant(assistant));
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
