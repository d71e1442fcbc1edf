//! Bitboard acceleration layer.
//!
//! Occupancy is kept as bitsets indexed by `TileIndex`:
//!
//! - [`Bitboard`]: one `u64`, for boards of at most 64 tiles
//! - [`SegmentedBitboard`]: ordered `u64` segments for larger boards
//! - [`BoardBits`]: picks one of the two from the tile count; callers never
//!   see the difference
//!
//! A [`BitboardLayout`] (built once per game) assigns pieces and players to
//! dense indices. A [`BitboardSnapshot`] is the occupancy of one `GameState`;
//! it is either rebuilt from scratch or patched from a `StateDelta`, and both
//! paths must produce identical snapshots. [`OccupancyIndex`] answers queries
//! against a snapshot.

mod bits;
mod layout;
mod occupancy;
mod snapshot;

pub use bits::{Bitboard, BoardBits, SegmentedBitboard};
pub use layout::BitboardLayout;
pub use occupancy::{OccupancyIndex, TileOccupant};
pub use snapshot::BitboardSnapshot;
