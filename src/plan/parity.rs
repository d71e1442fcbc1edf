//! Dual-run parity checking (`parity-check` feature).
//!
//! Runs every event through both the compiled plan and the recursive tree
//! walker and fails loudly when they disagree. Also checks the incremental
//! snapshot against a full rebuild. Only meant for debugging and tests.

use crate::bitboard::BitboardSnapshot;
use crate::core::{EngineError, GameEvent, GameState, InvalidEventError, ParityDivergenceError};
use crate::engine::CompiledGame;

use super::executor::{DecisionPlanExecutor, Execution};
use super::legacy::LegacyTreeWalker;
use super::observer::{EvaluationObserver, NoopObserver};

/// Wraps the compiled executor with a legacy cross-check.
#[derive(Clone, Copy)]
pub struct ParityExecutor<'a> {
    game: &'a CompiledGame,
    observer: &'a dyn EvaluationObserver,
}

impl<'a> ParityExecutor<'a> {
    /// The observer only sees the compiled run.
    pub fn new(game: &'a CompiledGame, observer: &'a dyn EvaluationObserver) -> Self {
        Self { game, observer }
    }

    /// Execute on both paths and compare.
    pub fn execute(
        &self,
        state: &GameState,
        snapshot: &BitboardSnapshot,
        event: &GameEvent,
    ) -> Result<Execution, EngineError> {
        let compiled = DecisionPlanExecutor::new(self.game, self.observer).execute(state, snapshot, event);
        let legacy = LegacyTreeWalker::new(self.game, &NoopObserver).execute(state, snapshot, event);

        match (compiled, legacy) {
            (Ok(compiled), Ok(legacy)) => {
                if summary(&compiled) != summary(&legacy) {
                    return Err(diverged(describe(&compiled), describe(&legacy)));
                }
                if let Some(transition) = &compiled.transition {
                    if transition.snapshot != self.game.snapshot(&transition.state) {
                        tracing::error!(state = transition.state.hash64(), "snapshot parity failure");
                        return Err(ParityDivergenceError::Snapshot {
                            state_hash: transition.state.hash64(),
                        }
                        .into());
                    }
                }
                Ok(compiled)
            }
            (Err(compiled), Err(legacy)) if compiled == legacy => Err(compiled.into()),
            (compiled, legacy) => {
                let compiled = describe_result(&compiled);
                let legacy = describe_result(&legacy);
                tracing::error!(%compiled, %legacy, "plan error parity failure");
                Err(ParityDivergenceError::Error { compiled, legacy }.into())
            }
        }
    }
}

fn summary(execution: &Execution) -> (Vec<u32>, Option<u128>) {
    (
        execution.applied.iter().map(|phase| phase.raw()).collect(),
        execution.transition.as_ref().map(|t| t.state.hash128()),
    )
}

fn describe(execution: &Execution) -> String {
    match &execution.transition {
        Some(transition) => format!("applied {:?} -> {}", execution.applied, transition.state.hash()),
        None => "ignored".to_string(),
    }
}

fn describe_result(result: &Result<Execution, InvalidEventError>) -> String {
    match result {
        Ok(execution) => describe(execution),
        Err(error) => error.to_string(),
    }
}

fn diverged(compiled: String, legacy: String) -> EngineError {
    tracing::error!(%compiled, %legacy, "plan outcome parity failure");
    ParityDivergenceError::Outcome { compiled, legacy }.into()
}
