//! Pattern classification into index-space shapes.

use smallvec::SmallVec;

use crate::core::GameDefinition;
use crate::topology::{BoardShape, DirectionIndex, TileIndex};

use super::pattern::{MovePath, MovementPattern, PathTerminal};

/// A movement pattern classified once at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompiledPattern {
    /// Jump along a fixed sequence of steps.
    FixedSequence { directions: SmallVec<[DirectionIndex; 4]> },
    /// One direction, one step or sliding.
    SingleDirection {
        direction: DirectionIndex,
        repeatable: bool,
    },
    /// Several directions, tried in order.
    MultiDirection {
        directions: SmallVec<[DirectionIndex; 8]>,
        repeatable: bool,
    },
    /// Resolved by the legacy visitor. Holds the position of the pattern in
    /// the piece's declaration.
    Unsupported { pattern_index: usize },
}

impl CompiledPattern {
    /// Classify one pattern. `Null` yields `None`.
    pub fn classify(pattern: &MovementPattern, pattern_index: usize, shape: &BoardShape) -> Option<Self> {
        let unsupported = CompiledPattern::Unsupported { pattern_index };
        let compiled = match pattern {
            MovementPattern::Null => return None,
            MovementPattern::Any => unsupported,
            MovementPattern::Fixed { directions } => {
                match directions
                    .iter()
                    .map(|d| shape.direction_index(*d))
                    .collect::<Option<SmallVec<_>>>()
                {
                    Some(directions) => CompiledPattern::FixedSequence { directions },
                    None => unsupported,
                }
            }
            MovementPattern::Direction { direction, repeatable } => match shape.direction_index(*direction) {
                Some(direction) => CompiledPattern::SingleDirection {
                    direction,
                    repeatable: *repeatable,
                },
                None => unsupported,
            },
            MovementPattern::MultiDirection { directions, repeatable } => {
                match directions
                    .iter()
                    .map(|d| shape.direction_index(*d))
                    .collect::<Option<SmallVec<_>>>()
                {
                    Some(directions) => CompiledPattern::MultiDirection {
                        directions,
                        repeatable: *repeatable,
                    },
                    None => unsupported,
                }
            }
        };
        Some(compiled)
    }

    /// True for patterns the compiled resolver handles itself.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, CompiledPattern::Unsupported { .. })
    }
}

/// Compiled patterns of every piece, indexed like `BitboardLayout` piece bits
/// (declaration order).
#[derive(Clone, Debug, Default)]
pub struct CompiledPatternTable {
    pieces: Vec<SmallVec<[CompiledPattern; 2]>>,
    unsupported: usize,
}

impl CompiledPatternTable {
    /// Classify every pattern of every piece.
    ///
    /// Unsupported shapes are not an error; they are logged and resolved
    /// through the legacy visitor.
    pub fn compile(definition: &GameDefinition, shape: &BoardShape) -> Self {
        let mut unsupported = 0;
        let pieces = definition
            .pieces()
            .iter()
            .map(|piece| {
                piece
                    .patterns
                    .iter()
                    .enumerate()
                    .filter_map(|(i, pattern)| {
                        let compiled = CompiledPattern::classify(pattern, i, shape)?;
                        if !compiled.is_supported() {
                            unsupported += 1;
                            tracing::warn!(
                                piece = %piece.id,
                                pattern_index = i,
                                ?pattern,
                                "movement pattern not compiled, using legacy visitor"
                            );
                        }
                        Some(compiled)
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            pieces = definition.pieces().len(),
            unsupported,
            "compiled movement patterns"
        );

        Self { pieces, unsupported }
    }

    /// Patterns of a piece bit, in declaration order.
    #[must_use]
    pub fn patterns(&self, piece: usize) -> &[CompiledPattern] {
        self.pieces.get(piece).map_or(&[], |patterns| patterns.as_slice())
    }

    /// Number of pieces.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Number of patterns that fall back to the legacy visitor.
    #[must_use]
    pub fn unsupported_count(&self) -> usize {
        self.unsupported
    }
}

/// A resolved move in index space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePath {
    pub tiles: SmallVec<[TileIndex; 8]>,
    pub terminal: PathTerminal,
}

impl TilePath {
    /// The destination tile.
    #[must_use]
    pub fn destination(&self) -> Option<TileIndex> {
        self.tiles.last().copied()
    }

    /// Translate to artifact space.
    #[must_use]
    pub fn to_move_path(&self, shape: &BoardShape) -> MovePath {
        MovePath {
            tiles: self.tiles.iter().map(|tile| shape.tile_id(*tile)).collect(),
            terminal: self.terminal,
        }
    }
}
