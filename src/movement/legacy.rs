//! Recursive pattern traversal over the artifact graph.
//!
//! This is the reference resolver: it reads neighbors straight from the
//! definition's relation list and occupancy straight from the `GameState`.
//! The compiled resolver uses it for patterns it cannot classify, and tests
//! use it as the oracle for the compiled path.

use smallvec::SmallVec;

use crate::bitboard::TileOccupant;
use crate::core::{ArtifactId, GameDefinition, GameState, PieceDefinition};

use super::pattern::{MovePath, MovementPattern, PathTerminal};

type Steps = SmallVec<[ArtifactId; 8]>;

/// Resolves movement patterns by walking tile relations.
#[derive(Clone, Copy, Debug)]
pub struct LegacyPatternVisitor<'a> {
    definition: &'a GameDefinition,
}

impl<'a> LegacyPatternVisitor<'a> {
    pub fn new(definition: &'a GameDefinition) -> Self {
        Self { definition }
    }

    /// First path over all of the piece's patterns, in declaration order.
    pub fn resolve(
        &self,
        state: &GameState,
        piece: ArtifactId,
        from: ArtifactId,
        to: ArtifactId,
    ) -> Option<MovePath> {
        let definition = self.definition.piece(piece)?;
        definition
            .patterns
            .iter()
            .find_map(|pattern| self.visit(state, definition, pattern, from, to))
    }

    /// Path for one pattern of a piece, by declaration index.
    pub fn resolve_pattern(
        &self,
        state: &GameState,
        piece: ArtifactId,
        pattern_index: usize,
        from: ArtifactId,
        to: ArtifactId,
    ) -> Option<MovePath> {
        let definition = self.definition.piece(piece)?;
        let pattern = definition.patterns.get(pattern_index)?;
        self.visit(state, definition, pattern, from, to)
    }

    fn visit(
        &self,
        state: &GameState,
        piece: &PieceDefinition,
        pattern: &MovementPattern,
        from: ArtifactId,
        to: ArtifactId,
    ) -> Option<MovePath> {
        if from == to {
            return None;
        }
        match pattern {
            MovementPattern::Null => None,
            MovementPattern::Any => {
                if !self.definition.tiles().contains(&from) || !self.definition.tiles().contains(&to) {
                    return None;
                }
                self.finish(state, piece, SmallVec::from_elem(to, 1))
            }
            MovementPattern::Fixed { directions } => {
                let mut steps = Steps::new();
                let mut tile = from;
                for direction in directions {
                    tile = self.neighbor(tile, *direction)?;
                    steps.push(tile);
                }
                if tile != to {
                    return None;
                }
                self.finish(state, piece, steps)
            }
            MovementPattern::Direction { direction, repeatable } => {
                self.visit_direction(state, piece, *direction, *repeatable, from, to)
            }
            MovementPattern::MultiDirection { directions, repeatable } => directions
                .iter()
                .find_map(|direction| self.visit_direction(state, piece, *direction, *repeatable, from, to)),
        }
    }

    fn visit_direction(
        &self,
        state: &GameState,
        piece: &PieceDefinition,
        direction: ArtifactId,
        repeatable: bool,
        from: ArtifactId,
        to: ArtifactId,
    ) -> Option<MovePath> {
        if !repeatable {
            let next = self.neighbor(from, direction)?;
            return if next == to {
                self.finish(state, piece, SmallVec::from_elem(to, 1))
            } else {
                None
            };
        }
        let mut visited: SmallVec<[ArtifactId; 16]> = SmallVec::new();
        visited.push(from);
        self.slide(state, piece, direction, from, to, &mut visited, Steps::new())
    }

    #[allow(clippy::too_many_arguments)]
    fn slide(
        &self,
        state: &GameState,
        piece: &PieceDefinition,
        direction: ArtifactId,
        tile: ArtifactId,
        to: ArtifactId,
        visited: &mut SmallVec<[ArtifactId; 16]>,
        mut steps: Steps,
    ) -> Option<MovePath> {
        let next = self.neighbor(tile, direction)?;
        if visited.contains(&next) {
            return None;
        }
        steps.push(next);
        if next == to {
            return self.finish(state, piece, steps);
        }
        if self.occupant(state, next, piece.owner) != TileOccupant::Empty {
            return None;
        }
        visited.push(next);
        self.slide(state, piece, direction, next, to, visited, steps)
    }

    fn finish(&self, state: &GameState, piece: &PieceDefinition, steps: Steps) -> Option<MovePath> {
        let destination = *steps.last()?;
        let terminal = match self.occupant(state, destination, piece.owner) {
            TileOccupant::Empty => PathTerminal::Empty,
            TileOccupant::Opponent => PathTerminal::Capture,
            TileOccupant::Own => return None,
        };
        Some(MovePath { tiles: steps, terminal })
    }

    /// Neighbor by linear scan of the relation list.
    pub fn neighbor(&self, tile: ArtifactId, direction: ArtifactId) -> Option<ArtifactId> {
        self.definition
            .relations()
            .iter()
            .find(|relation| relation.from == tile && relation.direction == direction)
            .map(|relation| relation.to)
    }

    /// Occupancy of a tile for the player owning `owner`'s pieces, read from
    /// the state. Only pieces declared in the definition count.
    pub fn occupant(&self, state: &GameState, tile: ArtifactId, owner: ArtifactId) -> TileOccupant {
        let mut result = TileOccupant::Empty;
        for id in state.pieces_on(tile) {
            match self.definition.piece(id) {
                Some(other) if other.owner == owner => return TileOccupant::Own,
                Some(_) => result = TileOccupant::Opponent,
                None => {}
            }
        }
        result
    }
}
