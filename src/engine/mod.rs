//! Engine entry points.
//!
//! [`CompiledGame`] holds everything built once per game: topology, rays,
//! pattern tables, the decision plan. [`GameProgress`] pairs it with one
//! state and handles events. Rules see both through an
//! [`AccelerationContext`].

mod context;
mod game;
mod progress;

pub use context::AccelerationContext;
pub use game::CompiledGame;
pub use progress::{EventOutcome, EventResult, GameProgress};
