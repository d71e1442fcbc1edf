//! # rust-bge
//!
//! Rule evaluation and move resolution core for turn-based board game
//! engines.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded boards, pieces or phases. Games describe
//!    their artifact graph in a `GameDefinition` and their rules as a
//!    `PhaseTree`.
//!
//! 2. **Compile Once**: Topology, sliding rays, movement tables and the
//!    decision plan are built once per game and shared read-only.
//!
//! 3. **Immutable States**: Every event produces a new `GameState`
//!    (persistent maps via `im-rs`) with its hashes computed eagerly.
//!
//! ## Architecture
//!
//! - **Decision plans**: the phase tree is flattened into an ordered entry
//!   list with gate groups and exclusivity masks. The first rule to accept an
//!   event is the one a recursive depth-first walk would pick.
//!
//! - **Compiled movement**: movement patterns are classified into table
//!   lookups over precomputed rays; unusual shapes fall back to a recursive
//!   visitor.
//!
//! - **Bitboards**: occupancy is a dense `u64` for small boards and a
//!   segmented bitset beyond 64 tiles, patched incrementally per transition.
//!
//! ## Modules
//!
//! - `core`: Artifacts, players, state, events, RNG, configuration, errors
//! - `topology`: Dense tile and direction indices
//! - `bitboard`: Occupancy bitsets, snapshots and queries
//! - `movement`: Movement patterns, ray tables, move resolution
//! - `rules`: `Rule` and `Condition` traits and stock implementations
//! - `plan`: Phase trees, decision plan compiler and executor
//! - `engine`: Compiled games and game progress
//! - `hashing`: Deterministic 64/128-bit state hashes

pub mod bitboard;
pub mod core;
pub mod engine;
pub mod hashing;
pub mod movement;
pub mod plan;
pub mod rules;
pub mod topology;

// Re-export commonly used types
pub use crate::core::{
    ArtifactEntry, ArtifactId, ArtifactKind, ArtifactState,
    CompileError, CompileResult, EngineError, InvalidEventError,
    EngineConfig, EventKind, GameDefinition, GameEvent, GameState,
    PieceDefinition, PlayerId, PlayerMap,
    GameRng, GameRngState,
};

pub use crate::topology::{BoardShape, DirectionIndex, TileIndex};

pub use crate::bitboard::{BitboardLayout, BitboardSnapshot, BoardBits, OccupancyIndex};

pub use crate::movement::{
    CompiledPatternTable, CompiledResolver, LegacyPatternVisitor,
    MovePath, MovementPattern, PathTerminal, SlidingAttackTable,
};

pub use crate::rules::{Condition, ConditionRef, MovePieceRule, Rule, RuleResponse};

pub use crate::plan::{
    DecisionPlan, DecisionPlanExecutor, EvaluationObserver, EventPreprocessor,
    NoopObserver, PhaseId, PhaseNode, PhaseTree, SkipReason,
};

pub use crate::engine::{AccelerationContext, CompiledGame, EventOutcome, EventResult, GameProgress};

pub use crate::hashing::{StateHash, StateHasher};
