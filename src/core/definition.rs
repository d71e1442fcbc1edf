//! The artifact graph a game is compiled from.
//!
//! Games describe their board as tiles connected by directed relations
//! (`from --direction--> to`), plus players and pieces. The engine never
//! interprets tile or direction names; it only flattens this graph into
//! dense indices (`BoardShape`) and pattern tables.
//!
//! ## Usage
//!
//! ```
//! use rust_bge::core::{ArtifactId, GameDefinition, PieceDefinition};
//! use rust_bge::movement::MovementPattern;
//!
//! let east = ArtifactId(100);
//! let definition = GameDefinition::new()
//!     .with_tiles([ArtifactId(1), ArtifactId(2)])
//!     .with_direction(east)
//!     .with_relation(ArtifactId(1), east, ArtifactId(2))
//!     .with_player(ArtifactId(200))
//!     .with_piece(
//!         PieceDefinition::new(ArtifactId(300), ArtifactId(200))
//!             .with_pattern(MovementPattern::step(east)),
//!     );
//!
//! assert!(definition.validate().is_ok());
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::entity::ArtifactId;
use super::error::{CompileError, CompileResult};
use crate::movement::MovementPattern;

/// A directed edge of the tile graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRelation {
    pub from: ArtifactId,
    pub direction: ArtifactId,
    pub to: ArtifactId,
}

/// A piece: owner plus movement patterns, tried in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDefinition {
    pub id: ArtifactId,
    pub owner: ArtifactId,
    pub patterns: Vec<MovementPattern>,
}

impl PieceDefinition {
    /// Create a piece with no movement patterns.
    pub fn new(id: ArtifactId, owner: ArtifactId) -> Self {
        Self {
            id,
            owner,
            patterns: Vec::new(),
        }
    }

    /// Add a movement pattern (builder pattern).
    #[must_use]
    pub fn with_pattern(mut self, pattern: MovementPattern) -> Self {
        self.patterns.push(pattern);
        self
    }
}

/// Immutable artifact graph for one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDefinition {
    tiles: Vec<ArtifactId>,
    directions: Vec<ArtifactId>,
    relations: Vec<TileRelation>,
    players: Vec<ArtifactId>,
    pieces: Vec<PieceDefinition>,
}

impl GameDefinition {
    /// Create an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile.
    #[must_use]
    pub fn with_tile(mut self, tile: ArtifactId) -> Self {
        self.tiles.push(tile);
        self
    }

    /// Add several tiles, in order.
    #[must_use]
    pub fn with_tiles(mut self, tiles: impl IntoIterator<Item = ArtifactId>) -> Self {
        self.tiles.extend(tiles);
        self
    }

    /// Add a direction.
    #[must_use]
    pub fn with_direction(mut self, direction: ArtifactId) -> Self {
        self.directions.push(direction);
        self
    }

    /// Add a relation `from --direction--> to`.
    #[must_use]
    pub fn with_relation(mut self, from: ArtifactId, direction: ArtifactId, to: ArtifactId) -> Self {
        self.relations.push(TileRelation { from, direction, to });
        self
    }

    /// Add a player.
    #[must_use]
    pub fn with_player(mut self, player: ArtifactId) -> Self {
        self.players.push(player);
        self
    }

    /// Add a piece.
    #[must_use]
    pub fn with_piece(mut self, piece: PieceDefinition) -> Self {
        self.pieces.push(piece);
        self
    }

    /// Tiles in declaration order (this order becomes `TileIndex`).
    #[must_use]
    pub fn tiles(&self) -> &[ArtifactId] {
        &self.tiles
    }

    /// Directions in declaration order (this order becomes `DirectionIndex`).
    #[must_use]
    pub fn directions(&self) -> &[ArtifactId] {
        &self.directions
    }

    /// All relations.
    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Players in declaration order (this order becomes `PlayerId`).
    #[must_use]
    pub fn players(&self) -> &[ArtifactId] {
        &self.players
    }

    /// Pieces in declaration order.
    #[must_use]
    pub fn pieces(&self) -> &[PieceDefinition] {
        &self.pieces
    }

    /// Look up a piece definition.
    #[must_use]
    pub fn piece(&self, id: ArtifactId) -> Option<&PieceDefinition> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Check artifact uniqueness and that every reference resolves.
    ///
    /// Relations with the same origin and direction are reported by
    /// `BoardShape::build`, which is where the ambiguity matters.
    pub fn validate(&self) -> CompileResult<()> {
        let mut seen = FxHashSet::default();
        let all_ids = self
            .tiles
            .iter()
            .chain(&self.directions)
            .chain(&self.players)
            .chain(self.pieces.iter().map(|p| &p.id));
        for id in all_ids {
            if !seen.insert(*id) {
                return Err(CompileError::DuplicateArtifact(*id));
            }
        }

        for relation in &self.relations {
            for tile in [relation.from, relation.to] {
                if !self.tiles.contains(&tile) {
                    return Err(CompileError::UnknownTile(tile));
                }
            }
            if !self.directions.contains(&relation.direction) {
                return Err(CompileError::UnknownDirection(relation.direction));
            }
        }

        for piece in &self.pieces {
            if !self.players.contains(&piece.owner) {
                return Err(CompileError::UnknownOwner {
                    piece: piece.id,
                    owner: piece.owner,
                });
            }
        }

        Ok(())
    }
}
