//! Dense board shape with a flat neighbor table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ArtifactId, CompileError, CompileResult, GameDefinition};

/// Dense tile index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileIndex(pub u16);

impl TileIndex {
    /// Create a new tile index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// As a `usize` for table lookups.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dense direction index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectionIndex(pub u16);

impl DirectionIndex {
    /// Create a new direction index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// As a `usize` for table lookups.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable board topology.
///
/// `neighbors[tile * direction_count + direction]` is the tile reached by one
/// step, or `None` at the board edge.
#[derive(Clone, Debug)]
pub struct BoardShape {
    tiles: Vec<ArtifactId>,
    directions: Vec<ArtifactId>,
    tile_lookup: FxHashMap<ArtifactId, TileIndex>,
    direction_lookup: FxHashMap<ArtifactId, DirectionIndex>,
    neighbors: Vec<Option<TileIndex>>,
}

impl BoardShape {
    /// Flatten a definition's tile graph.
    ///
    /// Fails if the definition is invalid, if it has more tiles or directions
    /// than a `u16` can index, or if two relations leave the same tile in the
    /// same direction.
    pub fn build(definition: &GameDefinition) -> CompileResult<Self> {
        definition.validate()?;

        let tiles = definition.tiles().to_vec();
        let directions = definition.directions().to_vec();
        check_index_range("tile", tiles.len())?;
        check_index_range("direction", directions.len())?;

        let tile_lookup: FxHashMap<_, _> = tiles
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, TileIndex(i as u16)))
            .collect();
        let direction_lookup: FxHashMap<_, _> = directions
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, DirectionIndex(i as u16)))
            .collect();

        let mut neighbors = vec![None; tiles.len() * directions.len()];
        for relation in definition.relations() {
            let from = tile_lookup[&relation.from];
            let direction = direction_lookup[&relation.direction];
            let to = tile_lookup[&relation.to];

            let slot = &mut neighbors[from.index() * directions.len() + direction.index()];
            if slot.is_some() {
                return Err(CompileError::AmbiguousRelation {
                    tile: relation.from,
                    direction: relation.direction,
                });
            }
            *slot = Some(to);
        }

        tracing::debug!(
            tiles = tiles.len(),
            directions = directions.len(),
            relations = definition.relations().len(),
            "built board shape"
        );

        Ok(Self {
            tiles,
            directions,
            tile_lookup,
            direction_lookup,
            neighbors,
        })
    }

    /// Number of tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of directions.
    #[must_use]
    pub fn direction_count(&self) -> usize {
        self.directions.len()
    }

    /// One step from `tile` in `direction`.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, tile: TileIndex, direction: DirectionIndex) -> Option<TileIndex> {
        self.neighbors[tile.index() * self.directions.len() + direction.index()]
    }

    /// Index of a tile artifact.
    #[must_use]
    pub fn tile_index(&self, tile: ArtifactId) -> Option<TileIndex> {
        self.tile_lookup.get(&tile).copied()
    }

    /// Index of a direction artifact.
    #[must_use]
    pub fn direction_index(&self, direction: ArtifactId) -> Option<DirectionIndex> {
        self.direction_lookup.get(&direction).copied()
    }

    /// Artifact of a tile index.
    #[must_use]
    pub fn tile_id(&self, tile: TileIndex) -> ArtifactId {
        self.tiles[tile.index()]
    }

    /// Artifact of a direction index.
    #[must_use]
    pub fn direction_id(&self, direction: DirectionIndex) -> ArtifactId {
        self.directions[direction.index()]
    }

    /// All tile indices in order.
    pub fn tile_indices(&self) -> impl Iterator<Item = TileIndex> {
        (0..self.tiles.len() as u16).map(TileIndex)
    }

    /// All direction indices in order.
    pub fn direction_indices(&self) -> impl Iterator<Item = DirectionIndex> {
        (0..self.directions.len() as u16).map(DirectionIndex)
    }
}

fn check_index_range(what: &'static str, count: usize) -> CompileResult<()> {
    let limit = u16::MAX as usize;
    if count > limit {
        return Err(CompileError::IndexOverflow { what, count, limit });
    }
    Ok(())
}
