//! Error types.
//!
//! - [`CompileError`]: structural problems found while building a game
//!   (artifact graph, phase tree). Always surfaces at build time.
//! - [`InvalidEventError`]: a rule rejected an event that reached it.
//!   Fatal for that call; the caller's state is untouched.
//! - [`ParityDivergenceError`]: debug-only disagreement between the
//!   compiled and legacy evaluation paths (`parity-check` feature).
//!
//! Ignored events and unreachable destinations are ordinary values,
//! never errors.

use crate::core::entity::ArtifactId;
use crate::core::event::GameEvent;
use crate::plan::PhaseId;

/// Errors raised while compiling a game definition or phase tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Two phases share an id.
    #[error("duplicate phase id {0}")]
    DuplicatePhase(PhaseId),

    /// A phase lists a child that does not exist.
    #[error("phase {parent} references unknown child {child}")]
    UnknownPhase { parent: PhaseId, child: PhaseId },

    /// A phase is reachable from itself.
    #[error("phase cycle through {0}")]
    PhaseCycle(PhaseId),

    /// A phase is listed as the child of more than one parent.
    #[error("phase {0} has more than one parent")]
    SharedPhase(PhaseId),

    /// A leaf phase has no rule.
    #[error("leaf phase {0} has no rule")]
    MissingRule(PhaseId),

    /// The tree has no root phases.
    #[error("phase tree is empty")]
    EmptyTree,

    /// More exclusivity keys than fit in one mask.
    #[error("too many exclusivity keys (limit {limit})")]
    TooManyExclusivityKeys { limit: usize },

    /// Two artifacts in a definition share an id.
    #[error("duplicate artifact {0}")]
    DuplicateArtifact(ArtifactId),

    /// A relation or piece placement names a tile that is not defined.
    #[error("unknown tile {0}")]
    UnknownTile(ArtifactId),

    /// A relation names a direction that is not defined.
    #[error("unknown direction {0}")]
    UnknownDirection(ArtifactId),

    /// A piece is owned by an undefined player.
    #[error("piece {piece} has unknown owner {owner}")]
    UnknownOwner { piece: ArtifactId, owner: ArtifactId },

    /// Two relations leave the same tile in the same direction.
    #[error("tile {tile} has more than one neighbor in direction {direction}")]
    AmbiguousRelation { tile: ArtifactId, direction: ArtifactId },

    /// The definition exceeds what dense indices can address.
    #[error("{what} count {count} exceeds limit {limit}")]
    IndexOverflow {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

/// A rule reported `Invalid` for an event.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid event {event:?} in phase {phase} (rule `{rule}`, state {state_hash:#018x}): {reason}")]
pub struct InvalidEventError {
    pub phase: PhaseId,
    pub rule: String,
    pub reason: String,
    pub event: GameEvent,
    /// 64-bit hash of the state the event was evaluated against.
    pub state_hash: u64,
}

/// The compiled and legacy paths disagreed.
#[cfg(feature = "parity-check")]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParityDivergenceError {
    /// The two paths produced different outcomes or states.
    #[error("plan outcome diverged: compiled {compiled}, legacy {legacy}")]
    Outcome { compiled: String, legacy: String },

    /// One path failed and the other did not.
    #[error("plan error diverged: compiled {compiled}, legacy {legacy}")]
    Error { compiled: String, legacy: String },

    /// Incremental and rebuilt snapshots differ.
    #[error("snapshot diverged after state {state_hash:#018x}")]
    Snapshot { state_hash: u64 },
}

/// Umbrella error for callers that do not care about the category.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    InvalidEvent(#[from] InvalidEventError),

    #[cfg(feature = "parity-check")]
    #[error(transparent)]
    Parity(#[from] ParityDivergenceError),
}

/// Result alias for build steps.
pub type CompileResult<T> = Result<T, CompileError>;
