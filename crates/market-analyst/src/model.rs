//! Domain Models
//!
//! Uses `rust_decimal` for prices - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of market data for one symbol
///
/// Produced once per symbol per turn and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Ticker symbol (e.g., "BTC", "SOL")
    pub symbol: String,

    /// Last traded price in USD
    pub price: Decimal,

    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,

    /// 24h traded volume (units)
    pub volume: u64,

    /// Market capitalization in USD
    pub market_cap: u64,

    /// 24-hour price change percentage
    #[serde(rename = "24h_change")]
    pub change_24h: Decimal,

    /// Capture time
    pub timestamp: DateTime<Utc>,
}

impl MarketRecord {
    /// A record carrying no market information at all: no symbol, or every
    /// numeric field zero
    pub fn is_empty(&self) -> bool {
        self.symbol.trim().is_empty()
            || ([self.price, self.open, self.high, self.low, self.change_24h]
                .iter()
                .all(Decimal::is_zero)
                && self.volume == 0
                && self.market_cap == 0)
    }
}
