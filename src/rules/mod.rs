//! Rules and conditions, the leaves of a phase tree.
//!
//! Games implement [`Rule`] for their state transitions and [`Condition`]
//! for the state gates of their phases. The engine never interprets what a
//! rule does; it only decides which rule gets the event.

pub mod condition;
pub mod movement;
pub mod rule;

pub use condition::{AllOf, AlwaysValid, AnyOf, Condition, ConditionRef, FnCondition, NeverValid, Not, StateIs};
pub use movement::MovePieceRule;
pub use rule::{FnRule, Rule, RuleResponse};
