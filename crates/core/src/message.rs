//! Message and request body domain types.
//!
//! These are the value objects a caller hands to Concierge:
//! the caller owns the conversation, Concierge reads the latest message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions
    System,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    #[serde(default = "new_message_id")]
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Optional metadata (client info, provider info, etc.)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }
}

/// The body of an incoming conversational request.
///
/// Owned by the caller. Selection only ever reads the content of the
/// last message; assistants may forward the whole conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    /// Ordered chat messages, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Model requested by the caller for the eventual task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl RequestBody {
    /// A body holding a single user message.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            model: None,
        }
    }

    /// Content of the latest message, or `""` when there are none.
    pub fn last_message_content(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Copy of this body with `message` inserted ahead of the conversation.
    pub fn with_leading(&self, message: Message) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(message);
        messages.extend(self.messages.iter().cloned());
        Self {
            messages,
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello!");
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn last_message_content_reads_latest() {
        let body = RequestBody {
            messages: vec![Message::user("first"), Message::assistant("ok"), Message::user("second")],
            model: None,
        };
        assert_eq!(body.last_message_content(), "second");
    }

    #[test]
    fn last_message_content_of_empty_body() {
        assert_eq!(RequestBody::default().last_message_content(), "");
    }

    #[test]
    fn body_deserializes_without_ids() {
        let body: RequestBody = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"sum column B"}],"model":"gpt-4o-mini"}"#,
        )
        .unwrap();
        assert_eq!(body.messages.len(), 1);
        assert!(!body.messages[0].id.is_empty());
        assert_eq!(body.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn with_leading_prepends_without_mutating() {
        let body = RequestBody::from_user("task");
        let extended = body.with_leading(Message::system("rules"));
        assert_eq!(body.messages.len(), 1);
        assert_eq!(extended.messages.len(), 2);
        assert_eq!(extended.messages[0].role, Role::System);
        assert_eq!(extended.last_message_content(), "task");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::System).unwrap();
        assert_eq!(json, "\"system\"");
    }
}
