//! Conversation Contracts
//!
//! Explicit conversation state passed to the completion client. A
//! conversation always starts with the agent's system prompt; every other
//! turn is owned by whoever created the conversation and disappears with it.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered message history for one exchange with the model.
///
/// Deserialization rejects a message list that does not open with a system
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConversationMessages")]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ConversationMessages {
    messages: Vec<ChatMessage>,
}

impl TryFrom<ConversationMessages> for Conversation {
    type Error = String;

    fn try_from(raw: ConversationMessages) -> Result<Self, Self::Error> {
        match raw.messages.first() {
            Some(first) if first.role == ChatRole::System => Ok(Self {
                messages: raw.messages,
            }),
            Some(_) => Err("conversation must start with a system message".to_string()),
            None => Err("conversation has no messages".to_string()),
        }
    }
}

impl Conversation {
    /// Start a conversation holding only the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// All messages, system prompt first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The system prompt this conversation was started with.
    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// Number of turns after the system prompt.
    pub fn turns(&self) -> usize {
        self.messages.len() - 1
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Drop every turn, keeping the system prompt.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_system_prompt() {
        let mut conversation = Conversation::new("You are a reviewer.");
        conversation.push_user("Review this");
        conversation.push_assistant("Looks plausible");
        assert_eq!(conversation.turns(), 2);

        conversation.reset();

        assert_eq!(conversation.turns(), 0);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.system_prompt(), "You are a reviewer.");
    }

    #[test]
    fn test_deserialize_requires_system_prompt() {
        assert!(serde_json::from_str::<Conversation>(r#"{"messages": []}"#).is_err());
        assert!(serde_json::from_str::<Conversation>(
            r#"{"messages": [{"role": "user", "content": "hi"}]}"#
        )
        .is_err());

        let mut conversation = Conversation::new("You are a reviewer.");
        conversation.push_user("Review this");
        let json = serde_json::to_string(&conversation).unwrap();
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.system_prompt(), "You are a reviewer.");
        assert_eq!(back.turns(), 1);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
