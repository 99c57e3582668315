//! Mock Market Data
//!
//! Synthetic snapshots jittered around a fixed base price per symbol, with a
//! sleep standing in for exchange latency.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use super::MarketDataSource;
use crate::error::Result;
use crate::model::MarketRecord;

/// Simulated round trip of a real market data API
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

const FALLBACK_BASE_PRICE: Decimal = dec!(50.0);

/// Base price for a symbol; unknown symbols trade around 50.0
pub fn base_price(symbol: &str) -> Decimal {
    match symbol.to_uppercase().as_str() {
        "SOL" => dec!(100.0),
        "BTC" => dec!(45000.0),
        "ETH" => dec!(2500.0),
        "ADA" => dec!(0.5),
        "DOT" => dec!(8.0),
        _ => FALLBACK_BASE_PRICE,
    }
}

/// Scale `base` by `1 + pct` where pct is drawn from `[lo, hi)`, rounded to cents
fn jitter<R: Rng + ?Sized>(rng: &mut R, base: Decimal, lo: f64, hi: f64) -> Decimal {
    let factor = 1.0 + rng.gen_range(lo..hi);
    (base * Decimal::from_f64(factor).unwrap_or(Decimal::ONE)).round_dp(2)
}

/// Generate one synthetic snapshot
///
/// Price moves ±10%, open ±5%, high 0..+15%, low -15..0% around the base
/// price. Volume, market cap and 24h change are uniform in their ranges.
pub fn generate_record<R: Rng + ?Sized>(symbol: &str, rng: &mut R) -> MarketRecord {
    let base = base_price(symbol);
    let change = rng.gen_range(-15.0..=15.0_f64);

    MarketRecord {
        symbol: symbol.to_uppercase(),
        price: jitter(rng, base, -0.10, 0.10),
        open: jitter(rng, base, -0.05, 0.05),
        high: jitter(rng, base, 0.0, 0.15),
        low: jitter(rng, base, -0.15, 0.0),
        volume: rng.gen_range(1_000_000..=10_000_000),
        market_cap: rng.gen_range(1_000_000_000..=100_000_000_000),
        change_24h: Decimal::from_f64(change).unwrap_or(Decimal::ZERO).round_dp(2),
        timestamp: Utc::now(),
    }
}

/// Synthetic market data source
pub struct MockMarketData {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    /// Entropy-seeded source with the default simulated latency
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Deterministic source (for tests and demos)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Override the simulated latency
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn fetch(&self, symbol: &str) -> Result<MarketRecord> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut rng = self.rng.lock().await;
        let record = generate_record(symbol, &mut *rng);
        tracing::debug!(
            symbol = %record.symbol,
            price = %record.price,
            "Generated mock market data"
        );

        Ok(record)
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}
