//! Error Types for the Market Analyst

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {
    #[error("Failed to fetch market data for {symbol}: {detail}")]
    Fetch {
        symbol: String,
        detail: String,
    },

    #[error("No market data found for {0}")]
    MissingData(String),

    #[error("Invalid market data: {0}")]
    Validation(String),

    #[error("Language model request failed: {0}")]
    Provider(#[from] AgentError),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}
