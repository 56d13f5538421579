//! Conversation transcript.

use super::message::{Message, Role};

/// Default system prompt: use tools only when the request needs them.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to tools. \
1. ONLY use a tool if the user's request explicitly requires it. \
2. For casual conversation, greetings, or feedback (like 'cool', 'ok', 'thanks'), \
do NOT call any tools. Just respond with text.";

/// The running transcript of one chat session, seeded with a system prompt.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Shorten the transcript to its first `len` messages.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// Drop everything except the system prompt.
    pub fn clear(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_starts_with_system_prompt() {
        let conv = Conversation::default();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].role, Role::System);
        assert!(conv.messages()[0].content.contains("helpful assistant"));
    }

    #[test]
    fn test_clear_keeps_system_prompt() {
        let mut conv = Conversation::new("be brief");
        conv.push(Message::user("hi"));
        conv.push(Message::assistant("hello"));
        assert_eq!(conv.len(), 3);

        conv.clear();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.last().unwrap().content, "be brief");
    }
}
