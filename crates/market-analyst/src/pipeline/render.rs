//! Reply Text
//!
//! Fixed-format replies for everything the language model is not asked to
//! write.

use rust_decimal::Decimal;

use crate::model::MarketRecord;

pub const GREETING: &str = "Hello! I'm your market analysis assistant. I can help you \
calculate secret indicators for cryptocurrencies like SOL, BTC, ETH, ADA, and DOT. \
Just ask me to analyze any of these symbols!";

pub const PROMPT_FOR_INPUT: &str = "How can I help you with market analysis today?";

pub const NO_REPLY: &str = "I apologize, but I couldn't process your request. Please try again.";

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Qualitative band for an indicator score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SignalStrength {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::VeryStrong
        } else if score > 60.0 {
            Self::Strong
        } else if score > 30.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very strong",
        }
    }
}

/// Multi-line indicator report
pub fn indicator_report(symbol: &str, record: &MarketRecord, score: f64) -> String {
    format!(
        "🔍 Secret Indicator Analysis for {symbol}:\n\
         \n\
         📊 Current Market Data:\n\
         • Price: {price}\n\
         • 24h Change: {change}\n\
         • Volume: {volume}\n\
         • Market Cap: ${market_cap}\n\
         \n\
         🎯 Secret Indicator Score: {score:.2}/100\n\
         \n\
         💡 Interpretation:\n\
         • Score 0-30: Weak signal\n\
         • Score 31-60: Moderate signal\n\
         • Score 61-80: Strong signal\n\
         • Score 81-100: Very strong signal\n\
         \n\
         Current signal strength: {strength}",
        price = format_usd(record.price),
        change = format_change(record.change_24h),
        volume = group_thousands(&record.volume.to_string()),
        market_cap = group_thousands(&record.market_cap.to_string()),
        strength = SignalStrength::from_score(score).label(),
    )
}

pub fn analysis_failed(symbol: &str) -> String {
    format!("I apologize, but I couldn't complete the analysis for {symbol}. Please try again.")
}

pub fn error_reply(detail: &str) -> String {
    format!(
        "❌ Error: {detail}\n\nPlease try again or ask me to analyze a different \
         cryptocurrency (SOL, BTC, ETH, ADA, DOT)."
    )
}

/// `$45,123.40`
pub fn format_usd(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// `+3.25%` / `-1.10%`
pub fn format_change(value: Decimal) -> String {
    if value.is_zero() {
        return "+0.00%".into();
    }
    let sign = if value.is_sign_negative() { "-" } else { "+" };
    format!("{sign}{:.2}%", value.abs())
}

/// Insert thousands separators into a run of digits
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signal_bands() {
        assert_eq!(SignalStrength::from_score(0.0), SignalStrength::Weak);
        assert_eq!(SignalStrength::from_score(30.0), SignalStrength::Weak);
        assert_eq!(SignalStrength::from_score(30.01), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_score(60.0), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_score(80.0), SignalStrength::Strong);
        assert_eq!(SignalStrength::from_score(80.5), SignalStrength::VeryStrong);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(format_usd(dec!(45123.4)), "$45,123.40");
        assert_eq!(format_usd(dec!(0.5)), "$0.50");
        assert_eq!(format_change(dec!(3.25)), "+3.25%");
        assert_eq!(format_change(dec!(-1.1)), "-1.10%");
        assert_eq!(format_change(dec!(0)), "+0.00%");
    }

    #[test]
    fn test_report_contents() {
        let record = MarketRecord {
            symbol: "BTC".into(),
            price: dec!(46250.12),
            open: dec!(45000.00),
            high: dec!(47000.00),
            low: dec!(44000.00),
            volume: 4_567_890,
            market_cap: 12_345_678_901,
            change_24h: dec!(-4.2),
            timestamp: Utc::now(),
        };

        let report = indicator_report("BTC", &record, 72.5);
        assert!(report.contains("Secret Indicator Analysis for BTC"));
        assert!(report.contains("Price: $46,250.12"));
        assert!(report.contains("24h Change: -4.20%"));
        assert!(report.contains("Volume: 4,567,890"));
        assert!(report.contains("Market Cap: $12,345,678,901"));
        assert!(report.contains("Secret Indicator Score: 72.50/100"));
        assert!(report.ends_with("Current signal strength: Strong"));
    }

    #[test]
    fn test_error_reply_lists_symbols() {
        let text = error_reply("No market data found for ETH");
        assert!(text.starts_with("❌ Error: No market data found for ETH"));
        assert!(text.contains("SOL, BTC, ETH, ADA, DOT"));
    }
}
