//! Secret Indicator
//!
//! A toy score in [0, 100] built from volume, momentum and market cap, scaled
//! by a random multiplier. Identical inputs do not give identical scores.

use std::ops::RangeInclusive;

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{AnalystError, Result};
use crate::model::MarketRecord;

pub struct SecretIndicator;

impl SecretIndicator {
    /// Range the per-call multiplier is drawn from
    pub const MULTIPLIER_RANGE: RangeInclusive<f64> = 0.8..=1.2;

    pub const MAX_SCORE: f64 = 100.0;

    /// Score a record, drawing the multiplier from `rng`
    pub fn calculate<R: Rng + ?Sized>(record: &MarketRecord, rng: &mut R) -> Result<f64> {
        let multiplier = rng.gen_range(Self::MULTIPLIER_RANGE);
        Self::score_with_multiplier(record, multiplier)
    }

    /// The formula with the multiplier pinned
    ///
    /// ```text
    /// volume_factor     = volume / 1e6 * 0.1
    /// price_momentum    = |change_24h| * 0.05
    /// market_cap_factor = market_cap / 1e9 * 0.02
    /// score = clamp((sum * multiplier) * 10, 0, 100), 2 dp
    /// ```
    pub fn score_with_multiplier(record: &MarketRecord, multiplier: f64) -> Result<f64> {
        if record.is_empty() {
            return Err(AnalystError::Validation(
                "Market data is required for secret indicator calculation".into(),
            ));
        }
        if !multiplier.is_finite() {
            return Err(AnalystError::Validation(format!("multiplier {multiplier} is not finite")));
        }

        let volume_factor = record.volume as f64 / 1_000_000.0 * 0.1;
        let price_momentum = record.change_24h.to_f64().unwrap_or(0.0).abs() * 0.05;
        let market_cap_factor = record.market_cap as f64 / 1_000_000_000.0 * 0.02;

        let raw = (volume_factor + price_momentum + market_cap_factor) * multiplier;
        let normalized = (raw * 10.0).clamp(0.0, Self::MAX_SCORE);

        Ok((normalized * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::generate_record;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(volume: u64, market_cap: u64, change: Decimal) -> MarketRecord {
        MarketRecord {
            symbol: "SOL".into(),
            price: dec!(100.00),
            open: dec!(100.00),
            high: dec!(105.00),
            low: dec!(95.00),
            volume,
            market_cap,
            change_24h: change,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_pinned_multiplier_formula() {
        // 0.5 + 0.5 + 1.0 = 2.0 -> * 1.0 * 10 = 20
        let r = record(5_000_000, 50_000_000_000, dec!(-10.0));
        let score = SecretIndicator::score_with_multiplier(&r, 1.0).unwrap();
        assert!((score - 20.0).abs() < 1e-9);

        let low = SecretIndicator::score_with_multiplier(&r, 0.8).unwrap();
        assert!((low - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let r = record(1_234_567, 1_000_000_000, dec!(3.33));
        let score = SecretIndicator::score_with_multiplier(&r, 1.1).unwrap();
        assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_to_hundred() {
        let r = record(u64::MAX / 2, u64::MAX / 2, dec!(15.0));
        let score = SecretIndicator::score_with_multiplier(&r, 1.2).unwrap();
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_always_bounded_for_generated_data() {
        let mut rng = StdRng::seed_from_u64(99);
        for symbol in ["SOL", "BTC", "ETH", "ADA", "DOT", "XYZ"] {
            for _ in 0..500 {
                let r = generate_record(symbol, &mut rng);
                let score = SecretIndicator::calculate(&r, &mut rng).unwrap();
                assert!((0.0..=100.0).contains(&score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn test_empty_record_is_rejected() {
        let mut r = record(0, 0, Decimal::ZERO);
        r.price = Decimal::ZERO;
        r.open = Decimal::ZERO;
        r.high = Decimal::ZERO;
        r.low = Decimal::ZERO;
        let mut rng = StdRng::seed_from_u64(1);
        let err = SecretIndicator::calculate(&r, &mut rng).unwrap_err();
        assert!(matches!(err, AnalystError::Validation(_)));
    }

    #[test]
    fn test_change_only_record_is_scored() {
        // 12 * 0.05 = 0.6 -> * 1.0 * 10 = 6
        let mut r = record(0, 0, dec!(12.0));
        r.price = Decimal::ZERO;
        r.open = Decimal::ZERO;
        r.high = Decimal::ZERO;
        r.low = Decimal::ZERO;

        let score = SecretIndicator::score_with_multiplier(&r, 1.0).unwrap();
        assert!((score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_varies_between_calls() {
        let r = record(5_000_000, 50_000_000_000, dec!(5.0));
        let mut rng = StdRng::seed_from_u64(5);
        let scores: Vec<f64> = (0..20)
            .map(|_| SecretIndicator::calculate(&r, &mut rng).unwrap())
            .collect();
        assert!(scores.iter().any(|s| (s - scores[0]).abs() > f64::EPSILON));
    }
}
