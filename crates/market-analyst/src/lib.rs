//! # market-analyst
//!
//! A small conversational market analyst. Each user turn runs through a
//! fixed stage pipeline:
//!
//! ```text
//!                ┌──────────────┐
//!   user text ──▶│   classify   │
//!                └──────┬───────┘
//!           greet/general│      calculate indicator
//!                ┌───────┴─────────────┐
//!                │                     ▼
//!                │            ┌─────────────────┐  fail  ┌────────────────┐
//!                │            │ fetch market data├──────▶│ error response │
//!                │            └────────┬────────┘        └───────┬────────┘
//!                │                     ▼                         │
//!                │            ┌─────────────────┐  fail          │
//!                │            │ secret indicator├───────────────▶│
//!                │            └────────┬────────┘                │
//!                ▼                     ▼                         ▼
//!          ┌──────────────────────────────┐                    end
//!          │           respond            ├──────────────────▶
//!          └──────────────────────────────┘
//! ```
//!
//! Market data is synthetic and the indicator is randomized on purpose: this
//! is a demo of the orchestration, not a trading signal.

pub mod chat;
pub mod classifier;
pub mod error;
pub mod indicator;
pub mod market_data;
pub mod model;
pub mod pipeline;

pub use chat::ChatSession;
pub use classifier::{Classification, Intent, IntentClassifier};
pub use error::{AnalystError, Result};
pub use indicator::SecretIndicator;
pub use market_data::{MarketDataSource, MockMarketData};
pub use model::MarketRecord;
pub use pipeline::{ConversationState, MarketAnalysisAgent, Stage, StateUpdate, TurnOutcome};

/// Tickers the agent knows by name
pub const KNOWN_SYMBOLS: [&str; 5] = ["SOL", "BTC", "ETH", "ADA", "DOT"];

/// Symbol analyzed when the user asks about crypto without naming a ticker
pub const DEFAULT_SYMBOL: &str = "SOL";

/// System prompt for general-intent replies
pub const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful market analysis assistant. \
Respond conversationally and guide users to ask about secret indicator calculations \
for cryptocurrencies.";
