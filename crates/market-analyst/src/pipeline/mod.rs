//! Stage Pipeline
//!
//! Drives one turn from `Classify` to `End`. Routing is a closed `Stage`
//! enum checked against a fixed transition table at every step, so a stage
//! cannot send the turn somewhere it is not allowed to go.

pub mod render;
pub mod stages;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use state::{ConversationState, Stage, StateUpdate};

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use crate::error::{AnalystError, Result};
use crate::market_data::MarketDataSource;

/// Upper bound on stages per turn; a valid turn visits at most five
const MAX_STEPS: usize = 8;

/// Final state of a turn plus the stages it went through
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub trace: Vec<Stage>,
}

/// The market analysis agent
pub struct MarketAnalysisAgent {
    source: Arc<dyn MarketDataSource>,
    provider: Arc<dyn LlmProvider>,
    generation: GenerationOptions,
    rng: Mutex<StdRng>,
    max_steps: usize,
}

impl MarketAnalysisAgent {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        provider: Arc<dyn LlmProvider>,
        generation: GenerationOptions,
    ) -> Self {
        Self {
            source,
            provider,
            generation,
            rng: Mutex::new(StdRng::from_entropy()),
            max_steps: MAX_STEPS,
        }
    }

    /// Pin the indicator's randomness (for tests and demos)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[cfg(test)]
    pub(crate) fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Run one turn to completion
    pub async fn run(&self, mut state: ConversationState) -> Result<TurnOutcome> {
        let mut stage = Stage::Classify;
        let mut trace = Vec::with_capacity(self.max_steps);

        loop {
            if trace.len() >= self.max_steps {
                return Err(AnalystError::Pipeline(format!(
                    "turn exceeded {} stages: {trace:?}",
                    self.max_steps
                )));
            }

            let update = match stage {
                Stage::End => break,
                Stage::Classify => stages::classify(&state),
                Stage::FetchMarketData => {
                    stages::fetch_market_data(&state, self.source.as_ref()).await
                }
                Stage::CalculateIndicator => {
                    let mut rng = self.rng.lock().await;
                    stages::calculate_secret_indicator(&state, &mut *rng)
                }
                Stage::Respond => {
                    stages::respond(&state, self.provider.as_ref(), &self.generation).await
                }
                Stage::ErrorResponse => stages::error_response(&state),
            };
            trace.push(stage);
            state.apply(update);

            let next = state.next;
            if !stage.can_transition_to(next) {
                return Err(AnalystError::Pipeline(format!(
                    "invalid transition {stage} -> {next}"
                )));
            }
            tracing::debug!(from = %stage, to = %next, "Stage transition");
            stage = next;
        }

        Ok(TurnOutcome { state, trace })
    }
}
