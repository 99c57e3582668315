//! Conversation Messages
//!
//! Standard message format used across the agent system.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Agent reply
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Optional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

/// Additional message metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Token count (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,

    /// Model that generated this (for assistant messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Record which model produced this message
    pub fn with_model(mut self, model: impl Into<String>, tokens: Option<u32>) -> Self {
        self.metadata = Some(MessageMetadata {
            tokens,
            model: Some(model.into()),
        });
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// How much history a conversation keeps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "max_messages")]
pub enum RetentionPolicy {
    /// Keep every message
    #[default]
    Unbounded,

    /// Keep at most this many non-system messages, dropping the oldest first
    SlidingWindow(usize),
}

/// Conversation history with utility methods
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,

    #[serde(default)]
    retention: RetentionPolicy,
}

impl Conversation {
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            messages: Vec::new(),
            retention,
        }
    }

    /// Add a message, evicting the oldest history if the window is full
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.enforce_retention();
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Clear all messages except system prompt
    pub fn clear_history(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
    }

    fn enforce_retention(&mut self) {
        let RetentionPolicy::SlidingWindow(max) = self.retention else {
            return;
        };

        let mut excess = self
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .count()
            .saturating_sub(max);

        if excess == 0 {
            return;
        }

        tracing::debug!(dropped = excess, max, "Trimming conversation history");
        self.messages.retain(|m| {
            if excess > 0 && m.role != Role::System {
                excess -= 1;
                false
            } else {
                true
            }
        });
    }
}
