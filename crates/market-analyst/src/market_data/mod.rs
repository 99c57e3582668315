//! Market Data Sources
//!
//! Where the fetch stage gets its snapshots from. Only a synthetic source
//! ships today; real feeds would implement the same trait.

mod mock;

pub use mock::{base_price, generate_record, MockMarketData, DEFAULT_LATENCY};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::MarketRecord;

/// Market data source trait (Strategy pattern)
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch a fresh snapshot for one symbol
    async fn fetch(&self, symbol: &str) -> Result<MarketRecord>;

    /// Source name for logs
    fn name(&self) -> &str;
}
