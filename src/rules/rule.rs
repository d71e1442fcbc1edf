//! Event rules.
//!
//! A rule sits at a leaf of the phase tree. For every event that reaches it,
//! the executor first asks `check`; only a `Valid` answer leads to `apply`.

use smallvec::SmallVec;

use crate::core::{EventKind, GameEvent, GameState};
use crate::engine::AccelerationContext;

/// Answer of `Rule::check`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleResponse {
    /// The rule handles the event; apply it and stop.
    Valid,
    /// Not this rule's business; try the next entry.
    Ignore,
    /// The event reached the rule but is illegal. Fatal for the call.
    Invalid(String),
}

impl RuleResponse {
    /// Create an `Invalid` response.
    pub fn invalid(reason: impl Into<String>) -> Self {
        RuleResponse::Invalid(reason.into())
    }

    /// True for `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, RuleResponse::Valid)
    }
}

/// Rule trait.
///
/// Games implement this trait for every kind of state transition.
///
/// ## Implementation Notes
///
/// - `check` and `apply` must be pure functions of their inputs
/// - `check` must return `Ignore` for event kinds outside `event_kinds`;
///   kind filtering relies on it to skip the call
/// - `apply` is only called right after `check` returned `Valid`
pub trait Rule: Send + Sync {
    /// Name used in errors and observer callbacks.
    fn name(&self) -> &str;

    /// Event kinds the rule can handle, or `None` for any kind.
    fn event_kinds(&self) -> Option<&[EventKind]> {
        None
    }

    /// Decide whether the rule handles the event.
    fn check(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> RuleResponse;

    /// Produce the successor state.
    fn apply(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> GameState;
}

type CheckFn = dyn Fn(&AccelerationContext<'_>, &GameEvent) -> RuleResponse + Send + Sync;
type ApplyFn = dyn Fn(&AccelerationContext<'_>, &GameEvent) -> GameState + Send + Sync;

/// A rule built from two closures.
///
/// ```
/// use rust_bge::core::{ArtifactId, ArtifactKind, ArtifactState, EventKind};
/// use rust_bge::rules::{FnRule, Rule, RuleResponse};
///
/// const SCORE: EventKind = EventKind::new(7);
///
/// let rule = FnRule::new(
///     "score",
///     |_, _| RuleResponse::Valid,
///     |ctx, event| {
///         ctx.state().with_state(
///             ArtifactId(1),
///             ArtifactKind::Custom(0),
///             ArtifactState::Value(event.value(0, 0)),
///         )
///     },
/// )
/// .for_kinds([SCORE]);
///
/// assert_eq!(rule.name(), "score");
/// assert_eq!(rule.event_kinds(), Some(&[SCORE][..]));
/// ```
pub struct FnRule {
    name: String,
    kinds: Option<SmallVec<[EventKind; 4]>>,
    check: Box<CheckFn>,
    apply: Box<ApplyFn>,
}

impl FnRule {
    /// Create a rule that accepts every event kind.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&AccelerationContext<'_>, &GameEvent) -> RuleResponse + Send + Sync + 'static,
        apply: impl Fn(&AccelerationContext<'_>, &GameEvent) -> GameState + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kinds: None,
            check: Box::new(check),
            apply: Box::new(apply),
        }
    }

    /// Restrict the rule to the given kinds. Other kinds are ignored by
    /// `check` whether or not the executor filters them.
    #[must_use]
    pub fn for_kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }
}

impl std::fmt::Debug for FnRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

impl Rule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn event_kinds(&self) -> Option<&[EventKind]> {
        self.kinds.as_deref()
    }

    fn check(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> RuleResponse {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind) {
                return RuleResponse::Ignore;
            }
        }
        (self.check)(ctx, event)
    }

    fn apply(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> GameState {
        (self.apply)(ctx, event)
    }
}
