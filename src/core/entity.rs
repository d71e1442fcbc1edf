//! Artifact identification.
//!
//! Every object in a game definition (tile, direction, player, piece, dice)
//! is an *artifact* with a unique `ArtifactId`. Identity is compared by value
//! and is stable for the lifetime of a compiled game.
//!
//! ## Usage
//!
//! ```
//! use rust_bge::core::{ArtifactId, ArtifactKind};
//!
//! let tile = ArtifactId::new(10);
//! assert_eq!(tile.raw(), 10);
//! assert_eq!(format!("{}", tile), "Artifact(10)");
//! assert_eq!(ArtifactKind::Tile.tag(), 0);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game artifact.
///
/// Ordering follows the raw value. `GameState` stores artifacts in this order,
/// which makes it the canonical order for hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub u32);

impl ArtifactId {
    /// Create a new artifact ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ArtifactId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Artifact({})", self.0)
    }
}

/// The type of an artifact.
///
/// The kind is part of every artifact state and of the canonical hash
/// encoding, so two states that only differ in kind hash differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Tile,
    Direction,
    Player,
    Piece,
    Dice,
    /// Game-specific artifact type.
    Custom(u16),
}

impl ArtifactKind {
    /// Stable numeric tag used by the canonical encoding.
    ///
    /// Custom kinds occupy the range above the built-in tags.
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            ArtifactKind::Tile => 0,
            ArtifactKind::Direction => 1,
            ArtifactKind::Player => 2,
            ArtifactKind::Piece => 3,
            ArtifactKind::Dice => 4,
            ArtifactKind::Custom(id) => 0x100 + id as u32,
        }
    }
}
