//! Evaluation observers.
//!
//! The executor reports every step to an [`EvaluationObserver`]. Observers
//! see the evaluation, they cannot influence it: a panicking observer is
//! caught and logged, and the engine carries on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use crate::core::GameEvent;
use crate::hashing::StateHash;
use crate::rules::RuleResponse;

use super::phase::PhaseId;

/// Why an entry was not evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A gate covering the entry evaluated to false.
    GroupGateFailed,
    /// Another member of the entry's exclusivity set already applied.
    ExclusivityMasked,
    /// The rule does not handle the event kind.
    KindFiltered,
}

/// Hooks called by the executor. Every method defaults to doing nothing.
pub trait EvaluationObserver: Send + Sync {
    /// An entry passed its gates and its rule is about to be checked.
    fn on_phase_enter(&self, _phase: PhaseId, _event: &GameEvent) {}

    /// A rule's `check` returned.
    fn on_rule_evaluated(&self, _phase: PhaseId, _rule: &str, _response: &RuleResponse) {}

    /// A rule's `apply` produced a new state.
    fn on_rule_applied(&self, _phase: PhaseId, _rule: &str) {}

    /// An entry was skipped without calling its rule.
    fn on_rule_skipped(&self, _phase: PhaseId, _reason: SkipReason) {}

    /// No entry applied for the event.
    fn on_event_ignored(&self, _event: &GameEvent) {}

    /// A new state was produced and hashed.
    fn on_state_hashed(&self, _hash: StateHash) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

/// One recorded observer call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedEvent {
    PhaseEntered(PhaseId),
    RuleEvaluated(PhaseId, RuleResponse),
    RuleApplied(PhaseId),
    RuleSkipped(PhaseId, SkipReason),
    EventIgnored,
    StateHashed(StateHash),
}

/// Observer that records every call, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ObservedEvent) {
        // The list is append-only, so a poisoned lock is still consistent.
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    /// Copy of every recorded call, in order.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drop the recorded calls.
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Number of skips with the given reason.
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.count(|e| matches!(e, ObservedEvent::RuleSkipped(_, r) if *r == reason))
    }

    /// Number of rule checks.
    pub fn evaluated(&self) -> usize {
        self.count(|e| matches!(e, ObservedEvent::RuleEvaluated(..)))
    }

    /// Phases whose rule applied, in order.
    pub fn applied(&self) -> Vec<PhaseId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::RuleApplied(phase) => Some(phase),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&ObservedEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| predicate(e))
            .count()
    }
}

impl EvaluationObserver for RecordingObserver {
    fn on_phase_enter(&self, phase: PhaseId, _event: &GameEvent) {
        self.push(ObservedEvent::PhaseEntered(phase));
    }

    fn on_rule_evaluated(&self, phase: PhaseId, _rule: &str, response: &RuleResponse) {
        self.push(ObservedEvent::RuleEvaluated(phase, response.clone()));
    }

    fn on_rule_applied(&self, phase: PhaseId, _rule: &str) {
        self.push(ObservedEvent::RuleApplied(phase));
    }

    fn on_rule_skipped(&self, phase: PhaseId, reason: SkipReason) {
        self.push(ObservedEvent::RuleSkipped(phase, reason));
    }

    fn on_event_ignored(&self, _event: &GameEvent) {
        self.push(ObservedEvent::EventIgnored);
    }

    fn on_state_hashed(&self, hash: StateHash) {
        self.push(ObservedEvent::StateHashed(hash));
    }
}

/// Call an observer hook, containing panics.
pub(crate) fn notify(observer: &dyn EvaluationObserver, hook: &'static str, call: impl FnOnce(&dyn EvaluationObserver)) {
    if catch_unwind(AssertUnwindSafe(|| call(observer))).is_err() {
        tracing::warn!(hook, "evaluation observer panicked, ignoring");
    }
}
