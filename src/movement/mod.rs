//! Movement patterns and move resolution.
//!
//! Pieces declare how they move with [`MovementPattern`]s. At build time the
//! patterns are classified into [`CompiledPattern`]s and the board's sliding
//! rays are materialized into a [`SlidingAttackTable`]. At evaluation time a
//! [`CompiledResolver`] answers "can this piece go from F to T" with table
//! lookups and occupancy bitsets.
//!
//! Shapes the compiler does not handle are marked `Unsupported` and go
//! through the [`LegacyPatternVisitor`], which walks the artifact graph
//! recursively. Both paths return the same answer for every supported shape.
//!
//! ## Resolution rules
//!
//! - A destination holding an own piece fails.
//! - A destination holding only opponent pieces ends in a capture.
//! - Sliding moves fail if any tile before the destination is occupied.
//! - Fixed sequences jump: only the destination is checked.
//! - Patterns are tried in declaration order; the first path wins.

mod compiled;
mod legacy;
mod pattern;
mod resolver;
mod sliding;

pub use compiled::{CompiledPattern, CompiledPatternTable, TilePath};
pub use legacy::LegacyPatternVisitor;
pub use pattern::{MovePath, MovementPattern, PathTerminal};
pub use resolver::CompiledResolver;
pub use sliding::SlidingAttackTable;
