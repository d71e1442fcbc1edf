//! Decision plans: phase trees compiled into flat evaluation lists.
//!
//! Games organize their rules as a [`PhaseTree`]. At build time the tree is
//! flattened into a [`DecisionPlan`] whose entries follow the depth-first
//! order of the leaves, so the first rule to accept an event is the same one
//! a recursive walk would find. Conditions shared by reference become gate
//! groups evaluated once per event, and exclusivity keys become bit masks.
//!
//! ## Key Components
//!
//! - [`PhaseTree`] / [`PhaseNode`]: the input arena
//! - [`DecisionPlan`]: the compiled plan
//! - [`DecisionPlanExecutor`]: runs the plan for one event
//! - [`LegacyTreeWalker`]: recursive reference evaluation
//! - [`EvaluationObserver`]: hooks into every evaluation step

pub mod compiler;
pub mod executor;
pub mod legacy;
pub mod observer;
#[cfg(feature = "parity-check")]
pub mod parity;
pub mod phase;

pub use compiler::{DecisionPlan, DecisionPlanEntry, DecisionPlanGroup, GroupOrigin, MAX_EXCLUSIVITY_KEYS};
pub use executor::{DecisionPlanExecutor, Execution, Transition};
pub use legacy::LegacyTreeWalker;
pub use observer::{EvaluationObserver, NoopObserver, ObservedEvent, RecordingObserver, SkipReason};
#[cfg(feature = "parity-check")]
pub use parity::ParityExecutor;
pub use phase::{EventPreprocessor, PhaseId, PhaseNode, PhaseTree};
