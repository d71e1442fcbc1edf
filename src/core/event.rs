//! Game events.
//!
//! Events are the input of the decision plan. The engine does not know what
//! "move" or "roll" means: games define event kinds via `EventKind`, and
//! rules declare which kinds they handle so the executor can filter them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::ArtifactId;

/// Event kind identifier. Games define what kinds exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKind(pub u32);

impl EventKind {
    /// Create a new event kind.
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

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventKind({})", self.0)
    }
}

/// An event submitted to the engine.
///
/// The fields cover the common shapes (a player acting, a piece moving
/// between tiles, a dice value); everything else goes into `values`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The kind of event.
    pub kind: EventKind,

    /// Acting player artifact.
    pub player: Option<ArtifactId>,

    /// Piece the event is about.
    pub piece: Option<ArtifactId>,

    /// Origin tile.
    pub from: Option<ArtifactId>,

    /// Destination tile.
    pub to: Option<ArtifactId>,

    /// Numeric payload. Games define the meaning of each index.
    pub values: SmallVec<[i64; 2]>,
}

impl GameEvent {
    /// Create a new event with just a kind.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            player: None,
            piece: None,
            from: None,
            to: None,
            values: SmallVec::new(),
        }
    }

    /// Create a piece movement event.
    pub fn move_piece(kind: EventKind, piece: ArtifactId, from: ArtifactId, to: ArtifactId) -> Self {
        Self::new(kind).with_piece(piece).with_from(from).with_to(to)
    }

    /// Set the acting player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: ArtifactId) -> Self {
        self.player = Some(player);
        self
    }

    /// Set the piece (builder pattern).
    #[must_use]
    pub fn with_piece(mut self, piece: ArtifactId) -> Self {
        self.piece = Some(piece);
        self
    }

    /// Set the origin tile (builder pattern).
    #[must_use]
    pub fn with_from(mut self, from: ArtifactId) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the destination tile (builder pattern).
    #[must_use]
    pub fn with_to(mut self, to: ArtifactId) -> Self {
        self.to = Some(to);
        self
    }

    /// Append a value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.values.push(value);
        self
    }

    /// Replace the kind, keeping the payload.
    ///
    /// Preprocessors use this to turn a compound event into primitive ones.
    #[must_use]
    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Get a value by index, or a default.
    #[must_use]
    pub fn value(&self, index: usize, default: i64) -> i64 {
        self.values.get(index).copied().unwrap_or(default)
    }
}
