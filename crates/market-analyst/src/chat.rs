//! Chat Session
//!
//! Owns the history for one user and turns each line of input into exactly
//! one agent reply.

use std::sync::Arc;

use agent_core::{Message, RetentionPolicy, Role, Session};

use crate::error::Result;
use crate::pipeline::render::NO_REPLY;
use crate::pipeline::{ConversationState, MarketAnalysisAgent};

/// History kept by default; older non-system messages are dropped first
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A single user's conversation with the agent
pub struct ChatSession {
    agent: Arc<MarketAnalysisAgent>,
    session: Session,
}

impl ChatSession {
    pub fn new(agent: Arc<MarketAnalysisAgent>) -> Self {
        Self::with_retention(agent, RetentionPolicy::SlidingWindow(DEFAULT_HISTORY_LIMIT))
    }

    pub fn with_retention(agent: Arc<MarketAnalysisAgent>, retention: RetentionPolicy) -> Self {
        Self {
            agent,
            session: Session::with_retention(retention),
        }
    }

    /// Run one turn and return the agent's reply
    ///
    /// The user message and the reply are recorded together once the turn
    /// succeeds; a failed turn leaves the history untouched. A turn that ends
    /// without a reply answers with a fixed apology and records only the
    /// user message.
    pub async fn chat(&mut self, input: &str) -> Result<String> {
        let user = Message::user(input);
        let mut history = self.session.conversation.messages().to_vec();
        history.push(user.clone());
        let seeded_len = history.len();

        let outcome = self.agent.run(ConversationState::seeded(&history)).await?;
        self.session.record(user);

        tracing::info!(
            session = %self.session.id,
            stages = ?outcome.trace,
            intent = ?outcome.state.intent,
            "Turn complete"
        );

        let reply = outcome
            .state
            .messages
            .into_iter()
            .skip(seeded_len)
            .rev()
            .find(|m| m.role == Role::Assistant);

        match reply {
            Some(message) => {
                let text = message.content.clone();
                self.session.record(message);
                Ok(text)
            }
            None => {
                tracing::warn!(session = %self.session.id, "Turn produced no reply");
                Ok(NO_REPLY.to_string())
            }
        }
    }

    /// Forget the conversation so far
    pub fn reset(&mut self) {
        self.session.reset();
        tracing::info!(session = %self.session.id, "Session reset");
    }

    pub fn history(&self) -> &[Message] {
        self.session.conversation.messages()
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::MockMarketData;
    use crate::pipeline::testing::ScriptedProvider;
    use agent_core::GenerationOptions;
    use std::time::Duration;

    fn session() -> ChatSession {
        ChatSession::new(agent())
    }

    fn agent() -> Arc<MarketAnalysisAgent> {
        let source = Arc::new(MockMarketData::seeded(42).with_latency(Duration::ZERO));
        let provider = Arc::new(ScriptedProvider::new("Happy to help with market questions."));
        Arc::new(
            MarketAnalysisAgent::new(source, provider, GenerationOptions::default()).with_seed(42),
        )
    }

    fn score_in(reply: &str) -> f64 {
        let start = reply.find("Score: ").unwrap() + "Score: ".len();
        let end = reply[start..].find("/100").unwrap() + start;
        reply[start..end].parse().unwrap()
    }

    #[tokio::test]
    async fn test_greeting() {
        let mut chat = session();
        let reply = chat.chat("Hello!").await.unwrap();

        assert!(reply.contains("secret indicator"));
        assert!(reply.contains("SOL"));
    }

    #[tokio::test]
    async fn test_indicator_request() {
        let mut chat = session();
        let reply = chat.chat("Calculate secret indicator for SOL").await.unwrap();

        assert!(reply.contains("Secret Indicator Score"));
        assert!(reply.contains("for SOL"));
        let score = score_in(&reply);
        assert!((0.0..=100.0).contains(&score), "{score}");
    }

    #[tokio::test]
    async fn test_default_symbol_when_none_named() {
        let mut chat = session();
        let reply = chat.chat("analyze a coin for me").await.unwrap();

        assert!(reply.contains("Secret Indicator Analysis for SOL"));
    }

    #[tokio::test]
    async fn test_general_question() {
        let mut chat = session();
        let reply = chat.chat("What is cryptocurrency?").await.unwrap();

        assert_eq!(reply, "Happy to help with market questions.");
    }

    #[tokio::test]
    async fn test_history_grows_by_two_per_turn() {
        let mut chat = session();
        chat.chat("Hello!").await.unwrap();
        chat.chat("Analyze BTC").await.unwrap();
        chat.chat("What is cryptocurrency?").await.unwrap();

        let history = chat.history();
        assert_eq!(history.len(), 6);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[2].content, "Analyze BTC");
        assert!(history[3].content.contains("for BTC"));
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let mut chat = session();
        chat.chat("Hello!").await.unwrap();
        let id = chat.session().id.clone();

        chat.reset();
        assert!(chat.history().is_empty());
        assert_eq!(chat.session().id, id);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_history_untouched() {
        let source = Arc::new(MockMarketData::seeded(1).with_latency(Duration::ZERO));
        let provider = Arc::new(ScriptedProvider::new("unused"));
        let agent = MarketAnalysisAgent::new(source, provider, GenerationOptions::default())
            .with_max_steps(1);
        let mut chat = ChatSession::new(Arc::new(agent));

        assert!(chat.chat("Analyze SOL").await.is_err());
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn test_retention_caps_history() {
        let mut chat = ChatSession::with_retention(agent(), RetentionPolicy::SlidingWindow(4));
        for _ in 0..5 {
            chat.chat("Hello!").await.unwrap();
        }

        assert_eq!(chat.history().len(), 4);
    }
}
