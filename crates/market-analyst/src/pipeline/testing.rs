//! Test doubles for the language model and the market data feed

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, Result};
use async_trait::async_trait;

use crate::error::AnalystError;
use crate::market_data::MarketDataSource;
use crate::model::MarketRecord;

/// Replies with a fixed text and remembers the last prompt
pub struct ScriptedProvider {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Vec<Message>>,
}

impl ScriptedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Vec<Message> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = messages.to_vec();
        Ok(Completion::text(self.reply.clone(), options.model.clone()))
    }
}

/// Always fails like a missing credential would
pub struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    async fn complete(
        &self,
        _messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        Err(AgentError::Auth("OPENAI_API_KEY is not set".into()))
    }
}

/// Market data feed that is always down
pub struct OfflineSource;

#[async_trait]
impl MarketDataSource for OfflineSource {
    async fn fetch(&self, _symbol: &str) -> crate::error::Result<MarketRecord> {
        Err(AnalystError::Validation("feed offline".into()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
