//! Per-state occupancy snapshots.
//!
//! A snapshot is derived from two primary facts, the tile of every piece and
//! the number of pieces per (tile, player). Every bitset is a function of those
//! facts, which is what makes a patched snapshot equal to a rebuilt one.

use crate::core::{GameState, PlayerId, PlayerMap, StateDelta};
use crate::topology::{BoardShape, TileIndex};

use super::bits::BoardBits;
use super::layout::BitboardLayout;

/// Immutable occupancy of one game state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitboardSnapshot {
    /// Tiles holding at least one piece.
    occupied: BoardBits,
    /// Tiles holding at least one piece of each player.
    by_player: PlayerMap<BoardBits>,
    /// Pieces standing on a board tile (indexed by piece bit).
    on_board: BoardBits,
    /// Tile of each piece (indexed by piece bit).
    piece_tiles: Vec<Option<TileIndex>>,
    /// Pieces per `tile * player_count + player`.
    stack_counts: Vec<u16>,
}

impl BitboardSnapshot {
    /// Snapshot with no piece on the board.
    #[must_use]
    pub fn empty(layout: &BitboardLayout) -> Self {
        let tiles = layout.tile_count();
        Self {
            occupied: BoardBits::empty(tiles),
            by_player: PlayerMap::new(layout.player_count(), |_| BoardBits::empty(tiles)),
            on_board: BoardBits::empty(layout.piece_count()),
            piece_tiles: vec![None; layout.piece_count()],
            stack_counts: vec![0; tiles * layout.player_count()],
        }
    }

    /// Full rebuild from a state.
    ///
    /// Pieces without a state, captured pieces, and pieces on tiles that are
    /// not part of the board shape are off the board.
    #[must_use]
    pub fn build(layout: &BitboardLayout, state: &GameState, shape: &BoardShape) -> Self {
        let mut snapshot = Self::empty(layout);
        for piece in 0..layout.piece_count() {
            let tile = state
                .tile_of(layout.piece_id(piece))
                .and_then(|tile| shape.tile_index(tile));
            if let Some(tile) = tile {
                snapshot.place(layout, piece, tile);
            }
        }
        snapshot
    }

    /// Incremental update from the delta between the snapshot's state and a
    /// successor state. Equal to `build` on the successor.
    #[must_use]
    pub fn patched(&self, layout: &BitboardLayout, shape: &BoardShape, delta: &StateDelta) -> Self {
        let mut next = self.clone();
        for change in &delta.changes {
            let Some(piece) = layout.piece_index(change.artifact) else {
                continue;
            };
            let new_tile = change
                .after
                .as_ref()
                .and_then(|entry| entry.state.tile())
                .and_then(|tile| shape.tile_index(tile));
            let old_tile = next.piece_tiles[piece];
            if old_tile == new_tile {
                continue;
            }
            if let Some(tile) = old_tile {
                next.lift(layout, piece, tile);
            }
            if let Some(tile) = new_tile {
                next.place(layout, piece, tile);
            }
        }
        next
    }

    fn place(&mut self, layout: &BitboardLayout, piece: usize, tile: TileIndex) {
        let owner = layout.piece_owner(piece);
        let slot = self.count_slot(tile, owner);
        if self.stack_counts[slot] == 0 {
            self.by_player[owner] = self.by_player[owner].with_set(tile.index());
        }
        self.stack_counts[slot] += 1;
        self.occupied = self.occupied.with_set(tile.index());
        self.on_board = self.on_board.with_set(piece);
        self.piece_tiles[piece] = Some(tile);
    }

    fn lift(&mut self, layout: &BitboardLayout, piece: usize, tile: TileIndex) {
        let owner = layout.piece_owner(piece);
        let slot = self.count_slot(tile, owner);
        self.stack_counts[slot] -= 1;
        if self.stack_counts[slot] == 0 {
            self.by_player[owner] = self.by_player[owner].with_cleared(tile.index());
            if self.pieces_at(tile) == 0 {
                self.occupied = self.occupied.with_cleared(tile.index());
            }
        }
        self.on_board = self.on_board.with_cleared(piece);
        self.piece_tiles[piece] = None;
    }

    fn count_slot(&self, tile: TileIndex, player: PlayerId) -> usize {
        tile.index() * self.by_player.player_count() + player.index()
    }

    // === Queries ===

    /// Tiles holding at least one piece.
    #[must_use]
    pub fn occupied(&self) -> &BoardBits {
        &self.occupied
    }

    /// Tiles holding at least one piece of `player`.
    #[must_use]
    pub fn occupied_by(&self, player: PlayerId) -> Option<&BoardBits> {
        self.by_player.get(player)
    }

    /// Pieces on the board, by piece bit.
    #[must_use]
    pub fn on_board(&self) -> &BoardBits {
        &self.on_board
    }

    /// Tile of a piece bit.
    #[must_use]
    pub fn piece_tile(&self, piece: usize) -> Option<TileIndex> {
        self.piece_tiles.get(piece).copied().flatten()
    }

    /// Number of pieces of `player` on `tile`.
    #[must_use]
    pub fn stack_count(&self, tile: TileIndex, player: PlayerId) -> u16 {
        self.stack_counts
            .get(self.count_slot(tile, player))
            .copied()
            .unwrap_or(0)
    }

    /// Number of pieces on `tile`, all players.
    #[must_use]
    pub fn pieces_at(&self, tile: TileIndex) -> u32 {
        let players = self.by_player.player_count();
        let start = tile.index() * players;
        self.stack_counts
            .get(start..start + players)
            .map_or(0, |counts| counts.iter().map(|&c| u32::from(c)).sum())
    }

    /// Number of players the snapshot tracks.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.by_player.player_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArtifactId, GameDefinition, PieceDefinition};

    const WHITE: ArtifactId = ArtifactId(10);
    const BLACK: ArtifactId = ArtifactId(11);

    fn setup(tile_count: u32) -> (BitboardLayout, BoardShape) {
        let definition = GameDefinition::new()
            .with_tiles((1..=tile_count).map(ArtifactId))
            .with_player(WHITE)
            .with_player(BLACK)
            .with_piece(PieceDefinition::new(ArtifactId(1000), WHITE))
            .with_piece(PieceDefinition::new(ArtifactId(1001), WHITE))
            .with_piece(PieceDefinition::new(ArtifactId(1002), BLACK));
        (
            BitboardLayout::build(&definition).unwrap(),
            BoardShape::build(&definition).unwrap(),
        )
    }

    #[test]
    fn test_build() {
        let (layout, shape) = setup(8);
        let state = GameState::new()
            .with_piece_on(ArtifactId(1000), ArtifactId(1))
            .with_piece_on(ArtifactId(1002), ArtifactId(8));

        let snapshot = BitboardSnapshot::build(&layout, &state, &shape);

        assert!(snapshot.occupied().test(0));
        assert!(snapshot.occupied().test(7));
        assert_eq!(snapshot.occupied().pop_count(), 2);
        assert!(snapshot.occupied_by(PlayerId::new(0)).unwrap().test(0));
        assert!(!snapshot.occupied_by(PlayerId::new(0)).unwrap().test(7));
        assert!(snapshot.occupied_by(PlayerId::new(1)).unwrap().test(7));
        assert_eq!(snapshot.piece_tile(0), Some(TileIndex(0)));
        assert_eq!(snapshot.piece_tile(1), None);
        assert_eq!(snapshot.on_board().pop_count(), 2);
    }

    #[test]
    fn test_off_board_tiles_are_ignored() {
        let (layout, shape) = setup(4);
        let state = GameState::new().with_piece_on(ArtifactId(1000), ArtifactId(999));

        let snapshot = BitboardSnapshot::build(&layout, &state, &shape);
        assert!(snapshot.occupied().is_empty());
        assert_eq!(snapshot.piece_tile(0), None);
    }

    #[test]
    fn test_stacked_pieces_clear_on_last_leave() {
        let (layout, shape) = setup(4);
        let both = GameState::new()
            .with_piece_on(ArtifactId(1000), ArtifactId(2))
            .with_piece_on(ArtifactId(1001), ArtifactId(2));
        let one_left = both.with_piece_on(ArtifactId(1000), ArtifactId(3));

        let snapshot = BitboardSnapshot::build(&layout, &both, &shape);
        assert_eq!(snapshot.stack_count(TileIndex(1), PlayerId::new(0)), 2);

        let patched = snapshot.patched(&layout, &shape, &both.diff(&one_left));
        assert!(patched.occupied().test(1));
        assert!(patched.occupied().test(2));
        assert_eq!(patched.stack_count(TileIndex(1), PlayerId::new(0)), 1);
        assert_eq!(patched, BitboardSnapshot::build(&layout, &one_left, &shape));
    }

    #[test]
    fn test_patch_matches_rebuild_on_capture() {
        let (layout, shape) = setup(100);
        let before = GameState::new()
            .with_piece_on(ArtifactId(1000), ArtifactId(70))
            .with_piece_on(ArtifactId(1002), ArtifactId(71));
        let after = before
            .with_piece_on(ArtifactId(1000), ArtifactId(71))
            .with_state(
                ArtifactId(1002),
                crate::core::ArtifactKind::Piece,
                crate::core::ArtifactState::Captured,
            );

        let patched =
            BitboardSnapshot::build(&layout, &before, &shape).patched(&layout, &shape, &before.diff(&after));
        let rebuilt = BitboardSnapshot::build(&layout, &after, &shape);

        assert_eq!(patched, rebuilt);
        assert!(matches!(rebuilt.occupied(), BoardBits::Segmented(_)));
        assert_eq!(rebuilt.pieces_at(TileIndex(70)), 1);
        assert_eq!(rebuilt.pieces_at(TileIndex(69)), 0);
    }

    #[test]
    fn test_patch_leaves_original_untouched() {
        let (layout, shape) = setup(4);
        let before = GameState::new().with_piece_on(ArtifactId(1000), ArtifactId(1));
        let after = before.with_piece_on(ArtifactId(1000), ArtifactId(2));

        let snapshot = BitboardSnapshot::build(&layout, &before, &shape);
        let _ = snapshot.patched(&layout, &shape, &before.diff(&after));

        assert_eq!(snapshot.piece_tile(0), Some(TileIndex(0)));
    }
}
