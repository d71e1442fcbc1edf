//! Decision plan execution.
//!
//! One event is handled in two steps:
//!
//! 1. The preprocessor of the active phase (the first entry whose gates all
//!    pass) expands the event into primitive events. Plans without
//!    preprocessors skip the lookup.
//! 2. Each primitive event walks the plan once. Gates are evaluated lazily,
//!    at most once per group; a failing gate skips the rest of its range.
//!    The first rule answering `Valid` applies and ends the walk for that
//!    primitive event.
//!
//! Exclusivity bits of applied entries accumulate over all primitive events
//! of the original event.

use smallvec::{smallvec, SmallVec};

use crate::bitboard::BitboardSnapshot;
use crate::core::{GameEvent, GameState, InvalidEventError};
use crate::engine::{AccelerationContext, CompiledGame};
use crate::rules::RuleResponse;

use super::compiler::DecisionPlanEntry;
use super::observer::{notify, EvaluationObserver, SkipReason};
use super::phase::PhaseId;

/// A state produced by applied rules, with its snapshot.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: GameState,
    pub snapshot: BitboardSnapshot,
}

/// Result of executing one event.
#[derive(Clone, Debug)]
pub struct Execution {
    /// Phases whose rules applied, one per primitive event that matched.
    pub applied: SmallVec<[PhaseId; 2]>,
    /// Final state, `None` if nothing applied.
    pub transition: Option<Transition>,
}

impl Execution {
    /// True if no rule applied.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.applied.is_empty()
    }
}

type GateCache = SmallVec<[Option<bool>; 16]>;

/// Runs a compiled game's decision plan.
#[derive(Clone, Copy)]
pub struct DecisionPlanExecutor<'a> {
    game: &'a CompiledGame,
    observer: &'a dyn EvaluationObserver,
}

impl<'a> DecisionPlanExecutor<'a> {
    pub fn new(game: &'a CompiledGame, observer: &'a dyn EvaluationObserver) -> Self {
        Self { game, observer }
    }

    /// Handle one event against `state`.
    ///
    /// Returns `InvalidEventError` as soon as a rule answers `Invalid`; the
    /// input state is never modified.
    pub fn execute(
        &self,
        state: &GameState,
        snapshot: &BitboardSnapshot,
        event: &GameEvent,
    ) -> Result<Execution, InvalidEventError> {
        let primitives = self.preprocess(state, event);
        tracing::trace!(kind = %event.kind, primitives = primitives.len(), "executing event");

        let mut masked = 0u64;
        let mut applied = SmallVec::new();
        let mut transition: Option<Transition> = None;

        for primitive in &primitives {
            let (current, current_snapshot) = match &transition {
                Some(t) => (&t.state, &t.snapshot),
                None => (state, snapshot),
            };
            let Some((phase, next)) = self.run(current, current_snapshot, primitive, &mut masked)? else {
                continue;
            };
            let next_snapshot = self.game.advance_snapshot(current, current_snapshot, &next);
            let hash = next.hash();
            notify(self.observer, "on_state_hashed", |o| o.on_state_hashed(hash));
            applied.push(phase);
            transition = Some(Transition {
                state: next,
                snapshot: next_snapshot,
            });
        }

        if applied.is_empty() {
            notify(self.observer, "on_event_ignored", |o| o.on_event_ignored(event));
        }
        Ok(Execution { applied, transition })
    }

    /// First entry whose gates all pass in `state`.
    pub fn active_entry(&self, state: &GameState) -> Option<&'a DecisionPlanEntry> {
        let plan = self.game.plan();
        let mut cache: GateCache = smallvec![None; plan.groups().len()];
        plan.entries()
            .iter()
            .find(|entry| self.failed_gate(entry, state, &mut cache).is_none())
    }

    fn preprocess(&self, state: &GameState, event: &GameEvent) -> SmallVec<[GameEvent; 2]> {
        if !self.game.plan().has_preprocessors() {
            return smallvec![event.clone()];
        }
        match self.active_entry(state).and_then(|entry| entry.preprocessor.as_ref()) {
            Some(preprocessor) => preprocessor.expand(state, event),
            None => smallvec![event.clone()],
        }
    }

    /// Walk the plan for one primitive event.
    fn run(
        &self,
        state: &GameState,
        snapshot: &BitboardSnapshot,
        event: &GameEvent,
        masked: &mut u64,
    ) -> Result<Option<(PhaseId, GameState)>, InvalidEventError> {
        let plan = self.game.plan();
        let entries = plan.entries();
        let groups = plan.groups();
        let filtering = self.game.config().kind_filtering;
        let ctx = AccelerationContext::new(self.game, state, snapshot);
        let mut cache: GateCache = smallvec![None; groups.len()];

        let mut i = 0;
        while i < entries.len() {
            let entry = &entries[i];

            if entry.exclusivity & *masked != 0 {
                let end = entry
                    .gates
                    .iter()
                    .map(|g| &groups[*g as usize])
                    .find(|g| g.start == i && g.exclusivity_mask != 0 && g.exclusivity_mask & !*masked == 0)
                    .map_or(i + 1, |g| g.end);
                self.skip(&entries[i..end], SkipReason::ExclusivityMasked);
                i = end;
                continue;
            }

            if filtering && !entry.accepts(event.kind) {
                self.skip(std::slice::from_ref(entry), SkipReason::KindFiltered);
                i += 1;
                continue;
            }

            if let Some(group) = self.failed_gate(entry, state, &mut cache) {
                let end = groups[group].end;
                self.skip(&entries[i..end], SkipReason::GroupGateFailed);
                i = end;
                continue;
            }

            let phase = entry.phase;
            let name = entry.rule.name();
            notify(self.observer, "on_phase_enter", |o| o.on_phase_enter(phase, event));
            let response = entry.rule.check(&ctx, event);
            notify(self.observer, "on_rule_evaluated", |o| {
                o.on_rule_evaluated(phase, name, &response)
            });

            match response {
                RuleResponse::Ignore => i += 1,
                RuleResponse::Invalid(reason) => {
                    tracing::debug!(%phase, rule = name, %reason, "event rejected");
                    return Err(InvalidEventError {
                        phase,
                        rule: name.to_string(),
                        reason,
                        event: event.clone(),
                        state_hash: state.hash64(),
                    });
                }
                RuleResponse::Valid => {
                    let next = entry.rule.apply(&ctx, event);
                    notify(self.observer, "on_rule_applied", |o| o.on_rule_applied(phase, name));
                    tracing::trace!(%phase, rule = name, "rule applied");
                    *masked |= entry.exclusivity;
                    return Ok(Some((phase, next)));
                }
            }
        }
        Ok(None)
    }

    /// Index of the first gate of `entry` that fails, evaluating each group
    /// at most once per cache.
    fn failed_gate(&self, entry: &DecisionPlanEntry, state: &GameState, cache: &mut GateCache) -> Option<usize> {
        if entry.always_valid {
            return None;
        }
        let groups = self.game.plan().groups();
        entry.gates.iter().map(|g| *g as usize).find(|&g| {
            let pass = *cache[g].get_or_insert_with(|| groups[g].condition.evaluate(state));
            !pass
        })
    }

    fn skip(&self, entries: &[DecisionPlanEntry], reason: SkipReason) {
        for entry in entries {
            let phase = entry.phase;
            notify(self.observer, "on_rule_skipped", |o| o.on_rule_skipped(phase, reason));
        }
    }
}
