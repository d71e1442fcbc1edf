//! Core engine types: artifacts, players, state, events, RNG, configuration.
//!
//! This module contains the game-agnostic building blocks. Games describe
//! themselves through a `GameDefinition` and tune the engine through an
//! `EngineConfig`; neither is ever mutated after the game is compiled.

pub mod config;
pub mod definition;
pub mod entity;
pub mod error;
pub mod event;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{EngineConfig, DEFAULT_MAX_RAY_SLOTS};
pub use definition::{GameDefinition, PieceDefinition, TileRelation};
pub use entity::{ArtifactId, ArtifactKind};
pub use error::{CompileError, CompileResult, EngineError, InvalidEventError};
#[cfg(feature = "parity-check")]
pub use error::ParityDivergenceError;
pub use event::{EventKind, GameEvent};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState, RngFingerprint};
pub use state::{ArtifactChange, ArtifactEntry, ArtifactState, GameState, StateDelta};
