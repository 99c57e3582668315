//! Session Management
//!
//! A session owns one conversation's history across turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Conversation, Message, RetentionPolicy};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Conversation history
    pub conversation: Conversation,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a session whose history follows the given policy
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            conversation: Conversation::with_retention(retention),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Append a message to the history
    pub fn record(&mut self, message: Message) {
        self.conversation.push(message);
        self.touch();
    }

    /// Drop all history but keep the session identity
    pub fn reset(&mut self) {
        self.conversation.clear_history();
        self.touch();
    }
}
