//! Phase conditions.
//!
//! A condition gates a phase on the current state. Conditions are shared by
//! `Arc`: phases that hold the *same* `Arc` form one group in the compiled
//! plan and the condition is evaluated once for all of them. Two distinct
//! `Arc`s with equal behavior are never merged.

use std::sync::Arc;

use crate::core::{ArtifactId, ArtifactState, GameState};

/// A state predicate gating a phase.
pub trait Condition: Send + Sync {
    /// True if the gated phase is active in `state`.
    fn evaluate(&self, state: &GameState) -> bool;

    /// True if `evaluate` returns true for every state. The plan compiler
    /// never calls such conditions.
    fn is_always_valid(&self) -> bool {
        false
    }
}

/// Shared condition handle.
pub type ConditionRef = Arc<dyn Condition>;

/// Always true.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid;

impl Condition for AlwaysValid {
    fn evaluate(&self, _state: &GameState) -> bool {
        true
    }

    fn is_always_valid(&self) -> bool {
        true
    }
}

/// Always false.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverValid;

impl Condition for NeverValid {
    fn evaluate(&self, _state: &GameState) -> bool {
        false
    }
}

/// A condition built from a closure.
pub struct FnCondition<F>(pub F);

impl<F> Condition for FnCondition<F>
where
    F: Fn(&GameState) -> bool + Send + Sync,
{
    fn evaluate(&self, state: &GameState) -> bool {
        (self.0)(state)
    }
}

/// True if an artifact holds a given state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateIs {
    pub artifact: ArtifactId,
    pub state: ArtifactState,
}

impl Condition for StateIs {
    fn evaluate(&self, state: &GameState) -> bool {
        state.state_of(self.artifact) == Some(&self.state)
    }
}

// === Combinators ===

/// All conditions must be true.
pub struct AllOf(pub Vec<ConditionRef>);

impl Condition for AllOf {
    fn evaluate(&self, state: &GameState) -> bool {
        self.0.iter().all(|c| c.evaluate(state))
    }

    fn is_always_valid(&self) -> bool {
        self.0.iter().all(|c| c.is_always_valid())
    }
}

/// At least one condition must be true.
pub struct AnyOf(pub Vec<ConditionRef>);

impl Condition for AnyOf {
    fn evaluate(&self, state: &GameState) -> bool {
        self.0.iter().any(|c| c.evaluate(state))
    }

    fn is_always_valid(&self) -> bool {
        self.0.iter().any(|c| c.is_always_valid())
    }
}

/// Condition must be false.
pub struct Not(pub ConditionRef);

impl Condition for Not {
    fn evaluate(&self, state: &GameState) -> bool {
        !self.0.evaluate(state)
    }
}
