//! Immutable game state snapshots.
//!
//! A `GameState` is an ordered map from artifact id to artifact state plus an
//! optional RNG position. States are never mutated: every `with_*` method
//! returns a new state that shares structure with the old one (`im::OrdMap`),
//! and every state carries its 64-bit and 128-bit hashes, computed eagerly
//! when it is created.
//!
//! ## Usage
//!
//! ```
//! use rust_bge::core::{ArtifactId, GameState};
//!
//! let piece = ArtifactId(30);
//! let start = GameState::new().with_piece_on(piece, ArtifactId(1));
//! let moved = start.with_piece_on(piece, ArtifactId(2));
//!
//! assert_eq!(start.tile_of(piece), Some(ArtifactId(1)));
//! assert_eq!(moved.tile_of(piece), Some(ArtifactId(2)));
//! assert_ne!(start.hash(), moved.hash());
//! assert_eq!(start.diff(&moved).len(), 1);
//! ```

use im::ordmap::DiffItem;
use im::OrdMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{ArtifactId, ArtifactKind};
use super::rng::GameRngState;
use crate::hashing::{StateHash, StateHasher};

/// The state of one artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactState {
    /// A piece standing on a tile.
    PieceOnTile { tile: ArtifactId },
    /// A piece removed from the board.
    Captured,
    /// A single number (dice face, score, counter).
    Value(i64),
    /// A boolean (active player marker, toggles).
    Flag(bool),
    /// Several numbers (dice pools, resource vectors).
    Values(SmallVec<[i64; 4]>),
}

impl ArtifactState {
    /// Stable numeric tag for the state type, used by the canonical encoding.
    #[must_use]
    pub const fn state_type(&self) -> u16 {
        match self {
            ArtifactState::PieceOnTile { .. } => 1,
            ArtifactState::Captured => 2,
            ArtifactState::Value(_) => 3,
            ArtifactState::Flag(_) => 4,
            ArtifactState::Values(_) => 5,
        }
    }

    /// The tile of a piece state, if it is on the board.
    #[must_use]
    pub fn tile(&self) -> Option<ArtifactId> {
        match self {
            ArtifactState::PieceOnTile { tile } => Some(*tile),
            _ => None,
        }
    }
}

/// One element of a `GameState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub kind: ArtifactKind,
    pub state: ArtifactState,
}

impl ArtifactEntry {
    /// Create an entry.
    pub fn new(kind: ArtifactKind, state: ArtifactState) -> Self {
        Self { kind, state }
    }

    /// A piece on a tile.
    pub fn piece_on(tile: ArtifactId) -> Self {
        Self::new(ArtifactKind::Piece, ArtifactState::PieceOnTile { tile })
    }
}

/// Immutable state snapshot with eager hashes.
#[derive(Clone, Debug)]
pub struct GameState {
    artifacts: OrdMap<ArtifactId, ArtifactEntry>,
    rng: Option<GameRngState>,
    hash: StateHash,
}

impl GameState {
    /// Create an empty state without RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::seal(OrdMap::new(), None)
    }

    /// Create a state from entries. Later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = (ArtifactId, ArtifactEntry)>) -> Self {
        Self::seal(entries.into_iter().collect(), None)
    }

    fn seal(artifacts: OrdMap<ArtifactId, ArtifactEntry>, rng: Option<GameRngState>) -> Self {
        let hash = StateHasher::compute_parts(artifacts.len(), artifacts.iter(), rng.as_ref());
        Self { artifacts, rng, hash }
    }

    // === Derivation ===

    /// Return a state with one artifact set.
    #[must_use]
    pub fn with_entry(&self, artifact: ArtifactId, entry: ArtifactEntry) -> Self {
        Self::seal(self.artifacts.update(artifact, entry), self.rng)
    }

    /// Return a state with one artifact set (kind and state given separately).
    #[must_use]
    pub fn with_state(&self, artifact: ArtifactId, kind: ArtifactKind, state: ArtifactState) -> Self {
        self.with_entry(artifact, ArtifactEntry::new(kind, state))
    }

    /// Return a state with a piece placed on a tile.
    #[must_use]
    pub fn with_piece_on(&self, piece: ArtifactId, tile: ArtifactId) -> Self {
        self.with_entry(piece, ArtifactEntry::piece_on(tile))
    }

    /// Return a state with several artifacts set, hashing once.
    #[must_use]
    pub fn with_entries(&self, entries: impl IntoIterator<Item = (ArtifactId, ArtifactEntry)>) -> Self {
        let mut artifacts = self.artifacts.clone();
        for (artifact, entry) in entries {
            artifacts.insert(artifact, entry);
        }
        Self::seal(artifacts, self.rng)
    }

    /// Return a state without an artifact.
    #[must_use]
    pub fn without(&self, artifact: ArtifactId) -> Self {
        Self::seal(self.artifacts.without(&artifact), self.rng)
    }

    /// Return a state with the given RNG position.
    #[must_use]
    pub fn with_rng(&self, rng: GameRngState) -> Self {
        Self::seal(self.artifacts.clone(), Some(rng))
    }

    /// Apply a delta produced by [`GameState::diff`].
    #[must_use]
    pub fn apply_delta(&self, delta: &StateDelta) -> Self {
        let mut artifacts = self.artifacts.clone();
        for change in &delta.changes {
            match &change.after {
                Some(entry) => {
                    artifacts.insert(change.artifact, entry.clone());
                }
                None => {
                    artifacts.remove(&change.artifact);
                }
            }
        }
        let rng = if delta.rng_changed { delta.rng } else { self.rng };
        Self::seal(artifacts, rng)
    }

    // === Queries ===

    /// Look up an artifact.
    #[must_use]
    pub fn get(&self, artifact: ArtifactId) -> Option<&ArtifactEntry> {
        self.artifacts.get(&artifact)
    }

    /// Look up an artifact's state.
    #[must_use]
    pub fn state_of(&self, artifact: ArtifactId) -> Option<&ArtifactState> {
        self.get(artifact).map(|entry| &entry.state)
    }

    /// The tile a piece stands on.
    #[must_use]
    pub fn tile_of(&self, piece: ArtifactId) -> Option<ArtifactId> {
        self.state_of(piece).and_then(ArtifactState::tile)
    }

    /// Pieces standing on a tile, in artifact order. O(n).
    pub fn pieces_on(&self, tile: ArtifactId) -> impl Iterator<Item = ArtifactId> + '_ {
        self.artifacts
            .iter()
            .filter(move |(_, entry)| entry.state.tile() == Some(tile))
            .map(|(id, _)| *id)
    }

    /// Iterate artifacts in canonical (id) order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactId, &ArtifactEntry)> {
        self.artifacts.iter()
    }

    /// Number of artifacts with a state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True if no artifact has a state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// The RNG position, if the game uses randomness.
    #[must_use]
    pub fn rng(&self) -> Option<&GameRngState> {
        self.rng.as_ref()
    }

    // === Hashes ===

    /// Both hashes.
    #[must_use]
    pub fn hash(&self) -> StateHash {
        self.hash
    }

    /// 64-bit hash.
    #[must_use]
    pub fn hash64(&self) -> u64 {
        self.hash.h64
    }

    /// 128-bit hash.
    #[must_use]
    pub fn hash128(&self) -> u128 {
        self.hash.h128
    }

    // === Diff ===

    /// Structural diff from `self` to `next`, in artifact order.
    ///
    /// Subtrees the two states share are skipped, so a successor built
    /// from `self` costs only its changed paths.
    #[must_use]
    pub fn diff(&self, next: &GameState) -> StateDelta {
        let changes = self
            .artifacts
            .diff(&next.artifacts)
            .map(|item| match item {
                DiffItem::Add(id, entry) => ArtifactChange::added(*id, entry.clone()),
                DiffItem::Remove(id, entry) => ArtifactChange::removed(*id, entry.clone()),
                DiffItem::Update {
                    old: (id, before),
                    new: (_, after),
                } => ArtifactChange {
                    artifact: *id,
                    before: Some(before.clone()),
                    after: Some(after.clone()),
                },
            })
            .collect();

        StateDelta {
            changes,
            rng_changed: self.rng != next.rng,
            rng: next.rng,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.rng == other.rng && self.artifacts == other.artifacts
    }
}

impl Eq for GameState {}

/// Change of one artifact between two states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactChange {
    pub artifact: ArtifactId,
    /// `None` if the artifact had no state before.
    pub before: Option<ArtifactEntry>,
    /// `None` if the artifact has no state after.
    pub after: Option<ArtifactEntry>,
}

impl ArtifactChange {
    fn added(artifact: ArtifactId, entry: ArtifactEntry) -> Self {
        Self {
            artifact,
            before: None,
            after: Some(entry),
        }
    }

    fn removed(artifact: ArtifactId, entry: ArtifactEntry) -> Self {
        Self {
            artifact,
            before: Some(entry),
            after: None,
        }
    }
}

/// Structural difference between two states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateDelta {
    pub changes: Vec<ArtifactChange>,
    pub rng_changed: bool,
    /// RNG position after the change (meaningful when `rng_changed`).
    pub rng: Option<GameRngState>,
}

impl StateDelta {
    /// Number of changed artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True if nothing changed, RNG included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && !self.rng_changed
    }
}
