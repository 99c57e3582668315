//! # agent-runtime
//!
//! Runtime providers and process settings for the market agent.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any OpenAI-compatible chat-completions endpoint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{OpenAiProvider, Settings};
//!
//! let settings = Settings::from_env();
//! let provider = OpenAiProvider::new(&settings)?;
//! ```

pub mod config;

#[cfg(feature = "openai")]
pub mod openai;

pub use config::Settings;

#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

// Re-export core types for convenience
pub use agent_core::{
    AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role,
};
