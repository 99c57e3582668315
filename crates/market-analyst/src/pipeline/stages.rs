//! Stage Functions
//!
//! Each stage reads the turn state and returns the update to merge. Stage
//! failures become `next = ErrorResponse` plus a message; they never abort
//! the turn.

use agent_core::{GenerationOptions, LlmProvider, Message};
use rand::Rng;

use super::render;
use super::state::{ConversationState, Stage, StateUpdate};
use crate::classifier::{Intent, IntentClassifier};
use crate::error::AnalystError;
use crate::indicator::SecretIndicator;
use crate::market_data::MarketDataSource;
use crate::{DEFAULT_SYMBOL, GENERAL_SYSTEM_PROMPT};

fn active_symbol(state: &ConversationState) -> String {
    state
        .current_symbol
        .clone()
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
}

pub fn classify(state: &ConversationState) -> StateUpdate {
    let classification = IntentClassifier::classify(&state.messages);
    tracing::debug!(
        intent = %classification.intent,
        symbol = ?classification.symbol,
        "Classified turn"
    );

    StateUpdate {
        intent: Some(classification.intent),
        current_symbol: classification.symbol,
        ..StateUpdate::route(classification.next)
    }
}

/// Fetch a snapshot unless the cache already holds one
pub async fn fetch_market_data(
    state: &ConversationState,
    source: &dyn MarketDataSource,
) -> StateUpdate {
    let symbol = active_symbol(state);

    if state.market_data_cache.contains_key(&symbol) {
        tracing::debug!(symbol = %symbol, "Market data cache hit");
        return StateUpdate::route(Stage::CalculateIndicator);
    }

    match source.fetch(&symbol).await {
        Ok(mut record) => {
            // cache key must match the symbol the compute stage will look up
            record.symbol.clone_from(&symbol);
            StateUpdate::route(Stage::CalculateIndicator).with_record(record)
        }
        Err(e) => {
            let error = match e {
                err @ AnalystError::Fetch { .. } => err,
                other => AnalystError::Fetch {
                    symbol: symbol.clone(),
                    detail: other.to_string(),
                },
            };
            tracing::warn!(
                symbol = %symbol,
                source = source.name(),
                error = %error,
                "Market data fetch failed"
            );
            StateUpdate::fail(error.to_string())
        }
    }
}

pub fn calculate_secret_indicator<R: Rng + ?Sized>(
    state: &ConversationState,
    rng: &mut R,
) -> StateUpdate {
    let symbol = active_symbol(state);

    let Some(record) = state.market_data_cache.get(&symbol) else {
        let error = AnalystError::MissingData(symbol);
        tracing::warn!(error = %error, "Indicator requested without market data");
        return StateUpdate::fail(error.to_string());
    };

    match SecretIndicator::calculate(record, rng) {
        Ok(score) => {
            tracing::debug!(symbol = %symbol, score, "Secret indicator computed");
            StateUpdate {
                indicator: Some(score),
                ..StateUpdate::route(Stage::Respond)
            }
        }
        Err(e) => {
            tracing::warn!(symbol = %symbol, error = %e, "Secret indicator failed");
            StateUpdate::fail(format!("Failed to calculate secret indicator: {e}"))
        }
    }
}

/// Render the reply for the classified intent
///
/// General chat goes to the language model. A provider failure is routed to
/// the error stage rather than failing the turn.
pub async fn respond(
    state: &ConversationState,
    provider: &dyn LlmProvider,
    options: &GenerationOptions,
) -> StateUpdate {
    match state.intent.unwrap_or(Intent::General) {
        Intent::Greet => StateUpdate::reply(Message::assistant(render::GREETING)),
        Intent::CalculateIndicator => {
            let symbol = active_symbol(state);
            let text = match (state.indicator, state.market_data_cache.get(&symbol)) {
                (Some(score), Some(record)) => render::indicator_report(&symbol, record, score),
                _ => render::analysis_failed(&symbol),
            };
            StateUpdate::reply(Message::assistant(text))
        }
        Intent::General => {
            let Some(last) = state.last_user_message() else {
                return StateUpdate::reply(Message::assistant(render::PROMPT_FOR_INPUT));
            };

            let prompt = [
                Message::system(GENERAL_SYSTEM_PROMPT),
                Message::user(last.content.clone()),
            ];

            match provider.complete(&prompt, options).await {
                Ok(completion) => {
                    let tokens = completion.usage.map(|u| u.total_tokens);
                    StateUpdate::reply(
                        Message::assistant(completion.content).with_model(completion.model, tokens),
                    )
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "Language model call failed"
                    );
                    StateUpdate::fail(AnalystError::Provider(e).to_string())
                }
            }
        }
    }
}

pub fn error_response(state: &ConversationState) -> StateUpdate {
    let detail = state
        .error_message
        .as_deref()
        .unwrap_or(render::UNKNOWN_ERROR);
    StateUpdate::reply(Message::assistant(render::error_reply(detail)))
}
