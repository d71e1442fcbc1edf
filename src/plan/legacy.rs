//! Recursive phase tree evaluation.
//!
//! Walks the tree depth-first for every event, evaluating conditions as it
//! goes and rebuilding snapshots from scratch. Slow, but it is the reference
//! the compiled plan is checked against: both must pick the same rule for
//! every event.

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::bitboard::BitboardSnapshot;
use crate::core::{GameEvent, GameState, InvalidEventError};
use crate::engine::{AccelerationContext, CompiledGame};
use crate::rules::RuleResponse;

use super::executor::{Execution, Transition};
use super::observer::{notify, EvaluationObserver, SkipReason};
use super::phase::{EventPreprocessor, PhaseId, PhaseNode};

/// Walks a compiled game's phase tree recursively.
#[derive(Clone, Copy)]
pub struct LegacyTreeWalker<'a> {
    game: &'a CompiledGame,
    observer: &'a dyn EvaluationObserver,
}

struct Walk<'s> {
    ctx: AccelerationContext<'s>,
    event: &'s GameEvent,
    masked: &'s FxHashSet<String>,
}

type Applied = (PhaseId, GameState, Option<String>);

impl<'a> LegacyTreeWalker<'a> {
    pub fn new(game: &'a CompiledGame, observer: &'a dyn EvaluationObserver) -> Self {
        Self { game, observer }
    }

    /// Handle one event against `state`. Same contract as
    /// `DecisionPlanExecutor::execute`.
    pub fn execute(
        &self,
        state: &GameState,
        _snapshot: &BitboardSnapshot,
        event: &GameEvent,
    ) -> Result<Execution, InvalidEventError> {
        let primitives = match self.find_preprocessor(state) {
            Some(preprocessor) => preprocessor.expand(state, event),
            None => smallvec![event.clone()],
        };

        let mut masked: FxHashSet<String> = FxHashSet::default();
        let mut applied = SmallVec::new();
        let mut current = state.clone();

        for primitive in &primitives {
            let snapshot = self.game.snapshot(&current);
            let walk = Walk {
                ctx: AccelerationContext::new(self.game, &current, &snapshot),
                event: primitive,
                masked: &masked,
            };
            let mut found = None;
            for root in self.game.tree().roots() {
                found = self.walk(&walk, *root, None)?;
                if found.is_some() {
                    break;
                }
            }
            let Some((phase, next, key)) = found else {
                continue;
            };
            if let Some(key) = key {
                masked.insert(key);
            }
            let hash = next.hash();
            notify(self.observer, "on_state_hashed", |o| o.on_state_hashed(hash));
            applied.push(phase);
            current = next;
        }

        if applied.is_empty() {
            notify(self.observer, "on_event_ignored", |o| o.on_event_ignored(event));
        }
        let transition = (!applied.is_empty()).then(|| Transition {
            snapshot: self.game.snapshot(&current),
            state: current,
        });
        Ok(Execution { applied, transition })
    }

    fn node(&self, id: PhaseId) -> Option<&'a PhaseNode> {
        self.game.tree().get(id)
    }

    fn passes(node: &PhaseNode, state: &GameState) -> bool {
        node.condition().map_or(true, |c| c.is_always_valid() || c.evaluate(state))
    }

    fn walk(&self, walk: &Walk<'_>, id: PhaseId, inherited_key: Option<&str>) -> Result<Option<Applied>, InvalidEventError> {
        let Some(node) = self.node(id) else {
            return Ok(None);
        };
        let key = node.exclusivity_key().or(inherited_key);
        let state = walk.ctx.state();

        if !node.is_leaf() {
            if !Self::passes(node, state) {
                self.skip_subtree(node, SkipReason::GroupGateFailed);
                return Ok(None);
            }
            for child in node.children() {
                if let Some(found) = self.walk(walk, *child, key)? {
                    return Ok(Some(found));
                }
            }
            return Ok(None);
        }

        // Masks apply per leaf: a descendant's own key overrides its parent's.
        if key.is_some_and(|k| walk.masked.contains(k)) {
            self.skip_subtree(node, SkipReason::ExclusivityMasked);
            return Ok(None);
        }
        if !Self::passes(node, state) {
            self.skip_subtree(node, SkipReason::GroupGateFailed);
            return Ok(None);
        }

        let Some(rule) = node.rule() else {
            return Ok(None);
        };
        let name = rule.name();
        notify(self.observer, "on_phase_enter", |o| o.on_phase_enter(id, walk.event));
        let response = rule.check(&walk.ctx, walk.event);
        notify(self.observer, "on_rule_evaluated", |o| o.on_rule_evaluated(id, name, &response));

        match response {
            RuleResponse::Ignore => Ok(None),
            RuleResponse::Invalid(reason) => Err(InvalidEventError {
                phase: id,
                rule: name.to_string(),
                reason,
                event: walk.event.clone(),
                state_hash: state.hash64(),
            }),
            RuleResponse::Valid => {
                let next = rule.apply(&walk.ctx, walk.event);
                notify(self.observer, "on_rule_applied", |o| o.on_rule_applied(id, name));
                Ok(Some((id, next, key.map(str::to_string))))
            }
        }
    }

    fn skip_subtree(&self, node: &PhaseNode, reason: SkipReason) {
        if node.is_leaf() {
            let id = node.id();
            notify(self.observer, "on_rule_skipped", |o| o.on_rule_skipped(id, reason));
            return;
        }
        for child in node.children() {
            if let Some(child) = self.node(*child) {
                self.skip_subtree(child, reason);
            }
        }
    }

    /// Preprocessor inherited by the first leaf whose path passes its gates.
    fn find_preprocessor(&self, state: &GameState) -> Option<&'a dyn EventPreprocessor> {
        self.game
            .tree()
            .roots()
            .iter()
            .find_map(|root| self.first_active(*root, state, None))
            .flatten()
    }

    /// `Some(inherited preprocessor)` for the first active leaf under `id`.
    fn first_active(
        &self,
        id: PhaseId,
        state: &GameState,
        inherited: Option<&'a dyn EventPreprocessor>,
    ) -> Option<Option<&'a dyn EventPreprocessor>> {
        let node = self.node(id)?;
        if !Self::passes(node, state) {
            return None;
        }
        let preprocessor = node.preprocessor().map(|p| p.as_ref()).or(inherited);
        if node.is_leaf() {
            return Some(preprocessor);
        }
        node.children()
            .iter()
            .find_map(|child| self.first_active(*child, state, preprocessor))
    }
}
