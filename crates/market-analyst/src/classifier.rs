//! Intent Classifier
//!
//! Keyword matching over the latest user message:
//! - Greeting: "hello", "good morning", ...
//! - Calculate indicator: an action keyword plus an asset keyword
//! - General: everything else, answered by the language model

use std::sync::LazyLock;

use agent_core::Message;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::Stage;
use crate::DEFAULT_SYMBOL;

/// What the user wants from this turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greet,
    CalculateIndicator,
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greet => write!(f, "greet"),
            Self::CalculateIndicator => write!(f, "calculate_indicator"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Keyword lists, matched as lowercase substrings
const GREETING_KEYWORDS: &[&str] = &[
    "hello", "hi", "hey", "good morning", "good afternoon", "good evening",
];

const ACTION_KEYWORDS: &[&str] = &["secret indicator", "calculate", "analyze", "indicator"];

const ASSET_KEYWORDS: &[&str] = &["sol", "btc", "eth", "ada", "dot", "crypto", "coin", "token"];

static TICKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(SOL|BTC|ETH|ADA|DOT)\b").expect("ticker pattern is a valid regex")
});

/// Result of classifying one turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Set only for indicator requests
    pub symbol: Option<String>,
    pub next: Stage,
}

impl Classification {
    const fn respond(intent: Intent) -> Self {
        Self {
            intent,
            symbol: None,
            next: Stage::Respond,
        }
    }
}

/// Intent classifier
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify the most recent message of a conversation
    ///
    /// An empty history is treated as a greeting; a trailing non-user message
    /// as general chat. Greetings win over indicator requests.
    pub fn classify(messages: &[Message]) -> Classification {
        let Some(last) = messages.last() else {
            return Classification::respond(Intent::Greet);
        };

        if !last.is_user() {
            return Classification::respond(Intent::General);
        }

        Self::classify_text(&last.content)
    }

    /// Classify a single piece of user text
    pub fn classify_text(text: &str) -> Classification {
        let input = text.to_lowercase();

        if contains_any(&input, GREETING_KEYWORDS) {
            return Classification::respond(Intent::Greet);
        }

        if contains_any(&input, ACTION_KEYWORDS) && contains_any(&input, ASSET_KEYWORDS) {
            return Classification {
                intent: Intent::CalculateIndicator,
                symbol: Some(extract_symbol(text)),
                next: Stage::FetchMarketData,
            };
        }

        Classification::respond(Intent::General)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// First known ticker in the text, matched case-insensitively
pub fn extract_symbol(text: &str) -> String {
    TICKER
        .captures(&text.to_uppercase())
        .and_then(|caps| caps.get(1))
        .map_or_else(|| DEFAULT_SYMBOL.to_string(), |m| m.as_str().to_string())
}
