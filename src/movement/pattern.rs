//! Declarative movement patterns and resolved paths.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ArtifactId;

/// How a piece may move, in artifact space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Follow the directions in order, one step each. Intermediate tiles
    /// are jumped over.
    Fixed { directions: Vec<ArtifactId> },

    /// Move in one direction, one step or sliding.
    Direction { direction: ArtifactId, repeatable: bool },

    /// Move in any one of several directions, one step or sliding.
    MultiDirection {
        directions: Vec<ArtifactId>,
        repeatable: bool,
    },

    /// No movement.
    Null,

    /// Any tile on the board.
    Any,
}

impl MovementPattern {
    /// One step in `direction`.
    #[must_use]
    pub fn step(direction: ArtifactId) -> Self {
        MovementPattern::Direction {
            direction,
            repeatable: false,
        }
    }

    /// Slide any distance in `direction`.
    #[must_use]
    pub fn slide(direction: ArtifactId) -> Self {
        MovementPattern::Direction {
            direction,
            repeatable: true,
        }
    }

    /// A fixed sequence of steps.
    #[must_use]
    pub fn fixed(directions: impl IntoIterator<Item = ArtifactId>) -> Self {
        MovementPattern::Fixed {
            directions: directions.into_iter().collect(),
        }
    }

    /// One of several directions.
    #[must_use]
    pub fn multi(directions: impl IntoIterator<Item = ArtifactId>, repeatable: bool) -> Self {
        MovementPattern::MultiDirection {
            directions: directions.into_iter().collect(),
            repeatable,
        }
    }
}

/// How a resolved path ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathTerminal {
    /// The destination is empty.
    Empty,
    /// The destination holds opponent pieces.
    Capture,
}

/// A resolved move in artifact space.
///
/// `tiles` lists every tile stepped on after the origin; the last one is the
/// destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePath {
    pub tiles: SmallVec<[ArtifactId; 8]>,
    pub terminal: PathTerminal,
}

impl MovePath {
    /// The destination tile.
    #[must_use]
    pub fn destination(&self) -> Option<ArtifactId> {
        self.tiles.last().copied()
    }

    /// True if the move captures.
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.terminal == PathTerminal::Capture
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True for a path with no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
