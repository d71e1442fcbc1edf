//! Piece and player index assignment.

use rustc_hash::FxHashMap;

use crate::core::{ArtifactId, CompileError, CompileResult, GameDefinition, PlayerId};

/// Immutable mapping from piece and player artifacts to dense indices.
///
/// Tiles need no mapping here: a tile's bit is its `TileIndex`. Pieces get
/// bits in declaration order, players get `PlayerId`s in declaration order.
#[derive(Clone, Debug)]
pub struct BitboardLayout {
    tile_count: usize,
    players: Vec<ArtifactId>,
    player_lookup: FxHashMap<ArtifactId, PlayerId>,
    pieces: Vec<ArtifactId>,
    piece_lookup: FxHashMap<ArtifactId, usize>,
    piece_owners: Vec<PlayerId>,
}

impl BitboardLayout {
    /// Assign indices for a validated definition.
    pub fn build(definition: &GameDefinition) -> CompileResult<Self> {
        let players = definition.players().to_vec();
        if players.len() > 255 {
            return Err(CompileError::IndexOverflow {
                what: "player",
                count: players.len(),
                limit: 255,
            });
        }

        let player_lookup: FxHashMap<_, _> = players
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, PlayerId::new(i as u8)))
            .collect();

        let mut pieces = Vec::with_capacity(definition.pieces().len());
        let mut piece_lookup = FxHashMap::default();
        let mut piece_owners = Vec::with_capacity(definition.pieces().len());
        for piece in definition.pieces() {
            let owner = player_lookup
                .get(&piece.owner)
                .copied()
                .ok_or(CompileError::UnknownOwner {
                    piece: piece.id,
                    owner: piece.owner,
                })?;
            piece_lookup.insert(piece.id, pieces.len());
            pieces.push(piece.id);
            piece_owners.push(owner);
        }

        Ok(Self {
            tile_count: definition.tiles().len(),
            players,
            player_lookup,
            pieces,
            piece_lookup,
            piece_owners,
        })
    }

    /// Number of tile bits.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of piece bits.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Bit index of a piece.
    #[inline]
    #[must_use]
    pub fn piece_index(&self, piece: ArtifactId) -> Option<usize> {
        self.piece_lookup.get(&piece).copied()
    }

    /// Artifact of a piece bit.
    #[must_use]
    pub fn piece_id(&self, index: usize) -> ArtifactId {
        self.pieces[index]
    }

    /// Owner of a piece bit.
    #[inline]
    #[must_use]
    pub fn piece_owner(&self, index: usize) -> PlayerId {
        self.piece_owners[index]
    }

    /// Owner of a piece artifact.
    #[must_use]
    pub fn owner_of(&self, piece: ArtifactId) -> Option<PlayerId> {
        self.piece_index(piece).map(|i| self.piece_owners[i])
    }

    /// Dense id of a player artifact.
    #[must_use]
    pub fn player_index(&self, player: ArtifactId) -> Option<PlayerId> {
        self.player_lookup.get(&player).copied()
    }

    /// Artifact of a dense player id.
    #[must_use]
    pub fn player_artifact(&self, player: PlayerId) -> ArtifactId {
        self.players[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PieceDefinition;

    fn definition() -> GameDefinition {
        GameDefinition::new()
            .with_tiles([ArtifactId(1), ArtifactId(2)])
            .with_player(ArtifactId(10))
            .with_player(ArtifactId(11))
            .with_piece(PieceDefinition::new(ArtifactId(20), ArtifactId(11)))
            .with_piece(PieceDefinition::new(ArtifactId(21), ArtifactId(10)))
    }

    #[test]
    fn test_indices() {
        let layout = BitboardLayout::build(&definition()).unwrap();

        assert_eq!(layout.tile_count(), 2);
        assert_eq!(layout.player_count(), 2);
        assert_eq!(layout.piece_count(), 2);
        assert_eq!(layout.piece_index(ArtifactId(21)), Some(1));
        assert_eq!(layout.piece_id(0), ArtifactId(20));
        assert_eq!(layout.piece_owner(0), PlayerId::new(1));
        assert_eq!(layout.owner_of(ArtifactId(21)), Some(PlayerId::new(0)));
        assert_eq!(layout.player_index(ArtifactId(11)), Some(PlayerId::new(1)));
        assert_eq!(layout.player_artifact(PlayerId::new(0)), ArtifactId(10));
        assert_eq!(layout.piece_index(ArtifactId(99)), None);
    }

    #[test]
    fn test_unknown_owner() {
        let definition = definition().with_piece(PieceDefinition::new(ArtifactId(22), ArtifactId(12)));
        assert!(matches!(
            BitboardLayout::build(&definition),
            Err(CompileError::UnknownOwner { .. })
        ));
    }
}
