//! # agent-core
//!
//! Conversation types and a provider-agnostic LLM abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Session                               │
//! │  ┌──────────────────────┐        ┌──────────────────────┐   │
//! │  │    Conversation      │        │    LlmProvider       │   │
//! │  │ (retention policy)   │        │    (Strategy)        │   │
//! │  └──────────────────────┘        └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the chat pipeline independent of the
//! backend: OpenAI, any OpenAI-compatible server, or a test double.

pub mod provider;
pub mod message;
pub mod error;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, RetentionPolicy, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use session::{Session, SessionId};
