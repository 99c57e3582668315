//! Turn State
//!
//! One `ConversationState` lives for exactly one turn. Stages never mutate
//! it directly; they return a `StateUpdate` that is merged in:
//! messages append, the market data cache merges per key, and every other
//! field is last-write-wins.

use std::collections::HashMap;

use agent_core::Message;
use serde::{Deserialize, Serialize};

use crate::classifier::Intent;
use crate::model::MarketRecord;

/// Pipeline stages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classify,
    FetchMarketData,
    CalculateIndicator,
    Respond,
    ErrorResponse,
    End,
}

impl Stage {
    /// Stages allowed to follow this one
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Classify => &[Self::FetchMarketData, Self::Respond],
            Self::FetchMarketData => &[Self::CalculateIndicator, Self::ErrorResponse],
            Self::CalculateIndicator => &[Self::Respond, Self::ErrorResponse],
            Self::Respond => &[Self::End, Self::ErrorResponse],
            Self::ErrorResponse => &[Self::End],
            Self::End => &[],
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classify => "intent_classifier",
            Self::FetchMarketData => "fetch_market_data",
            Self::CalculateIndicator => "calculate_secret_indicator",
            Self::Respond => "response",
            Self::ErrorResponse => "error_response",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working state of one turn
#[derive(Clone, Debug)]
pub struct ConversationState {
    /// Prior history plus anything appended this turn
    pub messages: Vec<Message>,

    /// Symbol -> most recent snapshot
    pub market_data_cache: HashMap<String, MarketRecord>,

    pub current_symbol: Option<String>,

    /// Last computed secret indicator score
    pub indicator: Option<f64>,

    pub intent: Option<Intent>,

    /// Stage to run next
    pub next: Stage,

    pub error_message: Option<String>,
}

impl ConversationState {
    /// Fresh turn state seeded from session history, with an empty cache
    pub fn seeded(history: &[Message]) -> Self {
        Self {
            messages: history.to_vec(),
            market_data_cache: HashMap::new(),
            current_symbol: None,
            indicator: None,
            intent: None,
            next: Stage::Classify,
            error_message: None,
        }
    }

    /// Merge a stage's output into the state
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        self.market_data_cache.extend(update.market_data);

        if let Some(symbol) = update.current_symbol {
            self.current_symbol = Some(symbol);
        }
        if let Some(score) = update.indicator {
            self.indicator = Some(score);
        }
        if let Some(intent) = update.intent {
            self.intent = Some(intent);
        }
        if let Some(next) = update.next {
            self.next = next;
        }
        if let Some(error) = update.error_message {
            self.error_message = Some(error);
        }
    }

    /// Cached snapshot for the active symbol
    pub fn current_record(&self) -> Option<&MarketRecord> {
        self.current_symbol
            .as_ref()
            .and_then(|s| self.market_data_cache.get(s))
    }

    /// Most recent user-originated message
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }
}

/// Partial state produced by one stage
#[derive(Clone, Debug, Default)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub market_data: HashMap<String, MarketRecord>,
    pub current_symbol: Option<String>,
    pub indicator: Option<f64>,
    pub intent: Option<Intent>,
    pub next: Option<Stage>,
    pub error_message: Option<String>,
}

impl StateUpdate {
    /// Update that only routes to the next stage
    pub fn route(next: Stage) -> Self {
        Self {
            next: Some(next),
            ..Self::default()
        }
    }

    /// Record a failure and route to the error stage
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            error_message: Some(error.into()),
            next: Some(Stage::ErrorResponse),
            ..Self::default()
        }
    }

    /// Append one agent reply and finish the turn
    pub fn reply(message: Message) -> Self {
        Self {
            messages: vec![message],
            next: Some(Stage::End),
            ..Self::default()
        }
    }

    pub fn with_record(mut self, record: MarketRecord) -> Self {
        self.market_data.insert(record.symbol.clone(), record);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(symbol: &str) -> MarketRecord {
        MarketRecord {
            symbol: symbol.into(),
            price: dec!(1.00),
            open: dec!(1.00),
            high: dec!(1.00),
            low: dec!(1.00),
            volume: 1,
            market_cap: 1,
            change_24h: dec!(0.00),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_messages_accumulate() {
        let mut state = ConversationState::seeded(&[Message::user("Hello!")]);
        state.apply(StateUpdate::reply(Message::assistant("Hi")));
        state.apply(StateUpdate::reply(Message::assistant("Again")));

        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[0].content, "Hello!");
    }

    #[test]
    fn test_cache_merges_instead_of_replacing() {
        let mut state = ConversationState::seeded(&[]);
        state.apply(StateUpdate::route(Stage::CalculateIndicator).with_record(record("SOL")));
        state.apply(StateUpdate::route(Stage::CalculateIndicator).with_record(record("BTC")));

        assert_eq!(state.market_data_cache.len(), 2);
        assert!(state.market_data_cache.contains_key("SOL"));
        assert!(state.market_data_cache.contains_key("BTC"));
    }

    #[test]
    fn test_scalar_fields_are_last_write_wins() {
        let mut state = ConversationState::seeded(&[]);
        state.apply(StateUpdate {
            current_symbol: Some("SOL".into()),
            intent: Some(Intent::CalculateIndicator),
            ..StateUpdate::route(Stage::FetchMarketData)
        });
        state.apply(StateUpdate {
            current_symbol: Some("ETH".into()),
            ..StateUpdate::default()
        });

        assert_eq!(state.current_symbol.as_deref(), Some("ETH"));
        assert_eq!(state.intent, Some(Intent::CalculateIndicator));
        assert_eq!(state.next, Stage::FetchMarketData);
    }

    #[test]
    fn test_transition_table() {
        assert!(Stage::Classify.can_transition_to(Stage::FetchMarketData));
        assert!(Stage::Classify.can_transition_to(Stage::Respond));
        assert!(!Stage::Classify.can_transition_to(Stage::CalculateIndicator));
        assert!(!Stage::FetchMarketData.can_transition_to(Stage::Respond));
        assert!(Stage::ErrorResponse.can_transition_to(Stage::End));
        assert!(Stage::End.successors().is_empty());
    }

    #[test]
    fn test_current_record_lookup() {
        let mut state = ConversationState::seeded(&[]);
        assert!(state.current_record().is_none());

        state.apply(StateUpdate {
            current_symbol: Some("DOT".into()),
            ..StateUpdate::default().with_record(record("DOT"))
        });
        assert_eq!(state.current_record().unwrap().symbol, "DOT");
    }
}
