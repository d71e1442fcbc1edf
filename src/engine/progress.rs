//! Game progress: one state of one compiled game.
//!
//! `GameProgress` is a value. Handling an event never changes it; it returns a
//! new progress alongside the outcome, so callers can keep or discard either.
//!
//! ## Usage
//!
//! ```
//! use rust_bge::core::{ArtifactId, EngineConfig, EventKind, GameDefinition, GameEvent, GameState, PieceDefinition};
//! use rust_bge::engine::{CompiledGame, GameProgress};
//! use rust_bge::movement::MovementPattern;
//! use rust_bge::plan::{PhaseId, PhaseNode, PhaseTree};
//! use rust_bge::rules::MovePieceRule;
//!
//! let (a, b, east, white, pawn) = (ArtifactId(1), ArtifactId(2), ArtifactId(10), ArtifactId(20), ArtifactId(30));
//! let definition = GameDefinition::new()
//!     .with_tiles([a, b])
//!     .with_direction(east)
//!     .with_relation(a, east, b)
//!     .with_player(white)
//!     .with_piece(PieceDefinition::new(pawn, white).with_pattern(MovementPattern::step(east)));
//! let tree = PhaseTree::new().with_root(PhaseNode::leaf(PhaseId::new(1), MovePieceRule::new("move", EventKind::new(0))));
//!
//! let game = CompiledGame::build(definition, tree, EngineConfig::default()).unwrap();
//! let progress = GameProgress::new(game, GameState::new().with_piece_on(pawn, a));
//!
//! let result = progress.handle_event(&GameEvent::move_piece(EventKind::new(0), pawn, a, b)).unwrap();
//! assert!(result.outcome.is_applied());
//! assert_eq!(result.progress.state().tile_of(pawn), Some(b));
//! ```

use std::sync::Arc;

use smallvec::SmallVec;

use crate::bitboard::BitboardSnapshot;
use crate::core::{GameEvent, GameState, InvalidEventError};
use crate::hashing::StateHash;
use crate::plan::{DecisionPlanExecutor, EvaluationObserver, Execution, NoopObserver, PhaseId};

use super::context::AccelerationContext;
use super::game::CompiledGame;

/// What handling an event did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// One rule applied per listed phase, in order.
    Applied { phases: SmallVec<[PhaseId; 2]> },
    /// No rule applied; the state is unchanged.
    Ignored,
}

impl EventOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored)
    }
}

/// The next progress and how it was reached.
#[derive(Clone, Debug)]
pub struct EventResult {
    pub progress: GameProgress,
    pub outcome: EventOutcome,
}

/// One state of a compiled game, ready to handle events.
#[derive(Clone)]
pub struct GameProgress {
    game: Arc<CompiledGame>,
    state: GameState,
    snapshot: BitboardSnapshot,
    observer: Arc<dyn EvaluationObserver>,
}

impl GameProgress {
    /// Start from `state`, building its snapshot.
    pub fn new(game: Arc<CompiledGame>, state: GameState) -> Self {
        let snapshot = game.snapshot(&state);
        Self {
            game,
            state,
            snapshot,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report evaluation steps to `observer`. Carried over to every progress
    /// derived from this one.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn EvaluationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn game(&self) -> &Arc<CompiledGame> {
        &self.game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> &BitboardSnapshot {
        &self.snapshot
    }

    pub fn hash(&self) -> StateHash {
        self.state.hash()
    }

    pub fn observer(&self) -> &Arc<dyn EvaluationObserver> {
        &self.observer
    }

    /// Context for queries against the current state.
    pub fn context(&self) -> AccelerationContext<'_> {
        AccelerationContext::new(&self.game, &self.state, &self.snapshot)
    }

    /// Run `event` through the decision plan.
    ///
    /// An ignored event yields a progress equal to this one. A rule answering
    /// `Invalid` aborts the whole event; `self` is unaffected either way.
    pub fn handle_event(&self, event: &GameEvent) -> Result<EventResult, InvalidEventError> {
        let execution = DecisionPlanExecutor::new(&self.game, self.observer.as_ref())
            .execute(&self.state, &self.snapshot, event)?;
        Ok(self.advance(execution))
    }

    /// Like `handle_event`, but also runs the legacy tree walk and fails if
    /// the two disagree.
    #[cfg(feature = "parity-check")]
    pub fn handle_event_with_parity(&self, event: &GameEvent) -> Result<EventResult, crate::core::EngineError> {
        let execution = crate::plan::ParityExecutor::new(&self.game, self.observer.as_ref())
            .execute(&self.state, &self.snapshot, event)?;
        Ok(self.advance(execution))
    }

    fn advance(&self, execution: Execution) -> EventResult {
        match execution.transition {
            Some(transition) => EventResult {
                progress: Self {
                    game: Arc::clone(&self.game),
                    state: transition.state,
                    snapshot: transition.snapshot,
                    observer: Arc::clone(&self.observer),
                },
                outcome: EventOutcome::Applied {
                    phases: execution.applied,
                },
            },
            None => EventResult {
                progress: self.clone(),
                outcome: EventOutcome::Ignored,
            },
        }
    }
}

impl std::fmt::Debug for GameProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameProgress")
            .field("state", &self.state.hash())
            .field("artifacts", &self.state.len())
            .finish()
    }
}
