//! Topology index: the tile graph flattened into dense integers.
//!
//! Everything above this module (rays, bitboards, compiled patterns) works on
//! `TileIndex` and `DirectionIndex`, never on artifact ids. The mapping is
//! fixed by declaration order in the `GameDefinition` and is stable for the
//! lifetime of a compiled game.

mod shape;

pub use shape::{BoardShape, DirectionIndex, TileIndex};
