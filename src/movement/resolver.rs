//! Table-driven move resolution.

use smallvec::SmallVec;

use crate::bitboard::{BitboardSnapshot, OccupancyIndex, TileOccupant};
use crate::core::{ArtifactId, GameState, PlayerId};
use crate::engine::CompiledGame;
use crate::topology::{DirectionIndex, TileIndex};

use super::compiled::{CompiledPattern, TilePath};
use super::legacy::LegacyPatternVisitor;
use super::pattern::{MovePath, PathTerminal};

/// Resolves moves against one state using compiled tables.
///
/// Borrowed from an `AccelerationContext`; cheap to create per query.
#[derive(Clone, Copy, Debug)]
pub struct CompiledResolver<'a> {
    game: &'a CompiledGame,
    state: &'a GameState,
    occupancy: OccupancyIndex<'a>,
    legacy: LegacyPatternVisitor<'a>,
}

impl<'a> CompiledResolver<'a> {
    pub fn new(game: &'a CompiledGame, state: &'a GameState, snapshot: &'a BitboardSnapshot) -> Self {
        Self {
            game,
            state,
            occupancy: OccupancyIndex::new(snapshot),
            legacy: LegacyPatternVisitor::new(game.definition()),
        }
    }

    /// Path for `piece` from `from` to `to`, trying the piece's patterns in
    /// declaration order. `None` if no pattern reaches the destination.
    pub fn try_resolve(&self, piece: ArtifactId, from: ArtifactId, to: ArtifactId) -> Option<MovePath> {
        if !self.game.config().compiled_patterns {
            return self.legacy.resolve(self.state, piece, from, to);
        }
        if from == to {
            return None;
        }

        let layout = self.game.layout();
        let shape = self.game.shape();
        let piece_bit = layout.piece_index(piece)?;
        let owner = layout.piece_owner(piece_bit);
        let from_index = shape.tile_index(from);
        let to_index = shape.tile_index(to);

        self.game.patterns().patterns(piece_bit).iter().find_map(|pattern| match pattern {
            CompiledPattern::Unsupported { pattern_index } => {
                self.legacy
                    .resolve_pattern(self.state, piece, *pattern_index, from, to)
            }
            supported => self
                .resolve_compiled(supported, owner, from_index?, to_index?)
                .map(|path| path.to_move_path(shape)),
        })
    }

    /// Index-space resolution of one supported pattern.
    pub fn resolve_compiled(
        &self,
        pattern: &CompiledPattern,
        owner: PlayerId,
        from: TileIndex,
        to: TileIndex,
    ) -> Option<TilePath> {
        if from == to {
            return None;
        }
        match pattern {
            CompiledPattern::FixedSequence { directions } => {
                let shape = self.game.shape();
                let mut tiles = SmallVec::new();
                let mut tile = from;
                for direction in directions {
                    tile = shape.neighbor(tile, *direction)?;
                    tiles.push(tile);
                }
                if tile != to {
                    return None;
                }
                self.finish(tiles, owner)
            }
            CompiledPattern::SingleDirection { direction, repeatable } => {
                self.resolve_direction(*direction, *repeatable, owner, from, to)
            }
            CompiledPattern::MultiDirection { directions, repeatable } => directions
                .iter()
                .find_map(|direction| self.resolve_direction(*direction, *repeatable, owner, from, to)),
            CompiledPattern::Unsupported { .. } => None,
        }
    }

    fn resolve_direction(
        &self,
        direction: DirectionIndex,
        repeatable: bool,
        owner: PlayerId,
        from: TileIndex,
        to: TileIndex,
    ) -> Option<TilePath> {
        if !repeatable {
            return if self.game.shape().neighbor(from, direction) == Some(to) {
                self.finish(SmallVec::from_elem(to, 1), owner)
            } else {
                None
            };
        }

        let rays = self.game.rays();
        if rays.is_over_budget() {
            return self.slide_uncached(direction, owner, from, to);
        }
        if !rays.ray_contains(from, direction, to) {
            return None;
        }
        let ray = rays.ray(from, direction);
        let position = ray.iter().position(|tile| *tile == to)?;
        if self.occupancy.first_blocker(&ray[..position]).is_some() {
            return None;
        }
        self.finish(ray[..=position].iter().copied().collect(), owner)
    }

    /// Sliding walk over the neighbor table, for boards whose rays exceeded
    /// the slot budget.
    fn slide_uncached(
        &self,
        direction: DirectionIndex,
        owner: PlayerId,
        from: TileIndex,
        to: TileIndex,
    ) -> Option<TilePath> {
        let shape = self.game.shape();
        let mut visited = crate::bitboard::BoardBits::empty(shape.tile_count()).with_set(from.index());
        let mut tiles = SmallVec::new();
        let mut tile = from;
        loop {
            let next = shape.neighbor(tile, direction)?;
            if visited.test(next.index()) {
                return None;
            }
            tiles.push(next);
            if next == to {
                return self.finish(tiles, owner);
            }
            if self.occupancy.is_occupied(next) {
                return None;
            }
            visited = visited.with_set(next.index());
            tile = next;
        }
    }

    fn finish(&self, tiles: SmallVec<[TileIndex; 8]>, owner: PlayerId) -> Option<TilePath> {
        let destination = *tiles.last()?;
        let terminal = match self.occupancy.occupant(destination, owner) {
            TileOccupant::Empty => PathTerminal::Empty,
            TileOccupant::Opponent => PathTerminal::Capture,
            TileOccupant::Own => return None,
        };
        Some(TilePath { tiles, terminal })
    }
}
