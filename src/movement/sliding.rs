//! Precomputed sliding rays.

use crate::bitboard::BoardBits;
use crate::core::EngineConfig;
use crate::topology::{BoardShape, DirectionIndex, TileIndex};

/// Boards up to this many tiles also get a membership mask per ray.
const MAX_MASKED_TILES: usize = 1024;

/// Ordered ray of tiles per (tile, direction).
///
/// A ray starts one step from its origin and stops at the board edge or just
/// before it would revisit a tile (the origin counts as visited), so cyclic
/// boards produce finite rays. All rays share one flat slot vector.
#[derive(Clone, Debug, Default)]
pub struct SlidingAttackTable {
    direction_count: usize,
    slots: Vec<TileIndex>,
    /// `(start, len)` into `slots`, per `tile * direction_count + direction`.
    spans: Vec<(u32, u32)>,
    /// Membership mask per ray, when the board is small enough.
    masks: Vec<BoardBits>,
    over_budget: bool,
}

impl SlidingAttackTable {
    /// Walk every (tile, direction) pair of the shape.
    ///
    /// If the total slot count would exceed `config.max_ray_slots` the table
    /// comes back empty and `is_over_budget` reports it.
    pub fn build(shape: &BoardShape, config: &EngineConfig) -> Self {
        let tile_count = shape.tile_count();
        let direction_count = shape.direction_count();
        let with_masks = tile_count <= MAX_MASKED_TILES;

        let mut slots = Vec::new();
        let mut spans = Vec::with_capacity(tile_count * direction_count);
        let mut masks = Vec::with_capacity(if with_masks { tile_count * direction_count } else { 0 });

        for tile in shape.tile_indices() {
            for direction in shape.direction_indices() {
                let start = slots.len();
                let mut visited = BoardBits::empty(tile_count).with_set(tile.index());
                let mut mask = BoardBits::empty(tile_count);
                let mut current = tile;

                while let Some(next) = shape.neighbor(current, direction) {
                    if visited.test(next.index()) {
                        break;
                    }
                    if slots.len() >= config.max_ray_slots {
                        tracing::warn!(
                            tiles = tile_count,
                            directions = direction_count,
                            budget = config.max_ray_slots,
                            "sliding ray budget exceeded, using empty ray table"
                        );
                        return Self::over_budget(direction_count);
                    }
                    visited = visited.with_set(next.index());
                    if with_masks {
                        mask = mask.with_set(next.index());
                    }
                    slots.push(next);
                    current = next;
                }

                spans.push((start as u32, (slots.len() - start) as u32));
                if with_masks {
                    masks.push(mask);
                }
            }
        }

        tracing::debug!(
            tiles = tile_count,
            directions = direction_count,
            slots = slots.len(),
            masked = with_masks,
            "built sliding attack table"
        );

        Self {
            direction_count,
            slots,
            spans,
            masks,
            over_budget: false,
        }
    }

    fn over_budget(direction_count: usize) -> Self {
        Self {
            direction_count,
            over_budget: true,
            ..Self::default()
        }
    }

    /// Tiles reachable by sliding from `tile` in `direction`, nearest first.
    /// Empty for unknown pairs or an over-budget table.
    #[inline]
    #[must_use]
    pub fn ray(&self, tile: TileIndex, direction: DirectionIndex) -> &[TileIndex] {
        let Some(&(start, len)) = self.spans.get(self.slot(tile, direction)) else {
            return &[];
        };
        let start = start as usize;
        &self.slots[start..start + len as usize]
    }

    /// Membership mask of a ray, if masks were built.
    #[inline]
    #[must_use]
    pub fn ray_mask(&self, tile: TileIndex, direction: DirectionIndex) -> Option<&BoardBits> {
        self.masks.get(self.slot(tile, direction))
    }

    /// True if `target` lies on the ray. O(1) with masks, a scan without.
    #[must_use]
    pub fn ray_contains(&self, tile: TileIndex, direction: DirectionIndex, target: TileIndex) -> bool {
        match self.ray_mask(tile, direction) {
            Some(mask) => mask.test(target.index()),
            None => self.ray(tile, direction).contains(&target),
        }
    }

    /// Total number of materialized slots.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Length of the longest ray.
    #[must_use]
    pub fn max_ray_len(&self) -> usize {
        self.spans.iter().map(|&(_, len)| len as usize).max().unwrap_or(0)
    }

    /// True if the build hit the slot budget and produced no rays.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.over_budget
    }

    fn slot(&self, tile: TileIndex, direction: DirectionIndex) -> usize {
        tile.index() * self.direction_count + direction.index()
    }
}
