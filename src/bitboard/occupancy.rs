//! Occupancy queries against a snapshot.

use crate::core::PlayerId;
use crate::topology::TileIndex;

use super::snapshot::BitboardSnapshot;

/// Who holds a tile, from one player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOccupant {
    Empty,
    /// At least one of the player's own pieces.
    Own,
    /// Only pieces of other players.
    Opponent,
}

/// Borrowed view over a snapshot answering O(1) occupancy questions.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyIndex<'a> {
    snapshot: &'a BitboardSnapshot,
}

impl<'a> OccupancyIndex<'a> {
    /// Wrap a snapshot.
    #[must_use]
    pub fn new(snapshot: &'a BitboardSnapshot) -> Self {
        Self { snapshot }
    }

    /// The underlying snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &'a BitboardSnapshot {
        self.snapshot
    }

    /// True if any piece stands on `tile`.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, tile: TileIndex) -> bool {
        self.snapshot.occupied().test(tile.index())
    }

    /// True if a piece of `player` stands on `tile`.
    #[inline]
    #[must_use]
    pub fn is_occupied_by(&self, tile: TileIndex, player: PlayerId) -> bool {
        self.snapshot
            .occupied_by(player)
            .is_some_and(|bits| bits.test(tile.index()))
    }

    /// Lowest-numbered player with a piece on `tile`.
    #[must_use]
    pub fn owner(&self, tile: TileIndex) -> Option<PlayerId> {
        if !self.is_occupied(tile) {
            return None;
        }
        PlayerId::all(self.snapshot.player_count()).find(|&player| self.is_occupied_by(tile, player))
    }

    /// Classify `tile` for `player`. Own pieces take precedence on mixed tiles.
    #[inline]
    #[must_use]
    pub fn occupant(&self, tile: TileIndex, player: PlayerId) -> TileOccupant {
        if !self.is_occupied(tile) {
            TileOccupant::Empty
        } else if self.is_occupied_by(tile, player) {
            TileOccupant::Own
        } else {
            TileOccupant::Opponent
        }
    }

    /// First occupied tile along `ray`, with its position in the ray.
    #[must_use]
    pub fn first_blocker(&self, ray: &[TileIndex]) -> Option<(usize, TileIndex)> {
        ray.iter()
            .enumerate()
            .find(|(_, tile)| self.is_occupied(**tile))
            .map(|(i, tile)| (i, *tile))
    }
}
