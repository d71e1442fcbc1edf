//! Per-state view over the compiled tables.

use crate::bitboard::{BitboardLayout, BitboardSnapshot, OccupancyIndex};
use crate::core::{EngineConfig, GameState};
use crate::movement::{CompiledResolver, SlidingAttackTable};
use crate::topology::BoardShape;

use super::game::CompiledGame;

/// What a rule sees while it is checked or applied: the current state, its
/// snapshot, and the game's precomputed tables.
///
/// Built fresh for every primitive event, never stored.
#[derive(Clone, Copy, Debug)]
pub struct AccelerationContext<'a> {
    game: &'a CompiledGame,
    state: &'a GameState,
    snapshot: &'a BitboardSnapshot,
}

impl<'a> AccelerationContext<'a> {
    pub fn new(game: &'a CompiledGame, state: &'a GameState, snapshot: &'a BitboardSnapshot) -> Self {
        Self { game, state, snapshot }
    }

    pub fn game(&self) -> &'a CompiledGame {
        self.game
    }

    pub fn state(&self) -> &'a GameState {
        self.state
    }

    pub fn snapshot(&self) -> &'a BitboardSnapshot {
        self.snapshot
    }

    pub fn shape(&self) -> &'a BoardShape {
        self.game.shape()
    }

    pub fn rays(&self) -> &'a SlidingAttackTable {
        self.game.rays()
    }

    pub fn layout(&self) -> &'a BitboardLayout {
        self.game.layout()
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.game.config()
    }

    /// Occupancy queries against the current snapshot.
    pub fn occupancy(&self) -> OccupancyIndex<'a> {
        OccupancyIndex::new(self.snapshot)
    }

    /// Move resolution against the current state.
    pub fn resolver(&self) -> CompiledResolver<'a> {
        CompiledResolver::new(self.game, self.state, self.snapshot)
    }
}
