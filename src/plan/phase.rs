//! Phase trees.
//!
//! A game's rules are organized as a tree of phases. Composite phases group
//! children under a shared condition; leaf phases hold the rule that
//! handles events. Nodes live in an arena and reference their children by
//! `PhaseId`, which lets the plan compiler report malformed trees (unknown
//! children, cycles, nodes with two parents) instead of looping on them.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use rust_bge::core::EventKind;
//! use rust_bge::plan::{PhaseId, PhaseNode, PhaseTree};
//! use rust_bge::rules::{FnRule, NeverValid, RuleResponse};
//!
//! let rule = || FnRule::new("noop", |_, _| RuleResponse::Ignore, |ctx, _| ctx.state().clone());
//!
//! let tree = PhaseTree::new()
//!     .with_root(PhaseNode::composite(PhaseId::new(1), [PhaseId::new(2), PhaseId::new(3)]))
//!     .with_phase(PhaseNode::leaf(PhaseId::new(2), rule()).with_exclusivity("move"))
//!     .with_phase(PhaseNode::leaf(PhaseId::new(3), rule()).when(Arc::new(NeverValid)));
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.roots(), &[PhaseId::new(1)]);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameEvent, GameState};
use crate::rules::{ConditionRef, Rule};

/// Phase identifier, unique within a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub u32);

impl PhaseId {
    /// Create a new phase ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase({})", self.0)
    }
}

/// Expands one event into the primitive events the plan evaluates.
///
/// A dice roll can become one move per die, a compound command its steps.
/// The preprocessor of the active phase is used; without one, the event is
/// evaluated as is.
pub trait EventPreprocessor: Send + Sync {
    fn expand(&self, state: &GameState, event: &GameEvent) -> SmallVec<[GameEvent; 2]>;
}

/// One node of a phase tree.
#[derive(Clone)]
pub struct PhaseNode {
    id: PhaseId,
    condition: Option<ConditionRef>,
    rule: Option<Arc<dyn Rule>>,
    children: SmallVec<[PhaseId; 4]>,
    exclusivity_key: Option<String>,
    preprocessor: Option<Arc<dyn EventPreprocessor>>,
}

impl PhaseNode {
    /// A leaf phase handling events with `rule`.
    pub fn leaf(id: PhaseId, rule: impl Rule + 'static) -> Self {
        Self::leaf_shared(id, Arc::new(rule))
    }

    /// A leaf phase with a shared rule.
    pub fn leaf_shared(id: PhaseId, rule: Arc<dyn Rule>) -> Self {
        Self {
            id,
            condition: None,
            rule: Some(rule),
            children: SmallVec::new(),
            exclusivity_key: None,
            preprocessor: None,
        }
    }

    /// A composite phase. Children are evaluated in the given order.
    pub fn composite(id: PhaseId, children: impl IntoIterator<Item = PhaseId>) -> Self {
        Self {
            id,
            condition: None,
            rule: None,
            children: children.into_iter().collect(),
            exclusivity_key: None,
            preprocessor: None,
        }
    }

    /// Gate the phase on a condition. Phases that should be grouped must
    /// receive clones of the same `Arc`.
    #[must_use]
    pub fn when(mut self, condition: ConditionRef) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Put the phase (and, for composites, its whole subtree) into an
    /// exclusivity set. Once a member applies a rule, every member is skipped
    /// for the rest of the event.
    #[must_use]
    pub fn with_exclusivity(mut self, key: impl Into<String>) -> Self {
        self.exclusivity_key = Some(key.into());
        self
    }

    /// Attach an event preprocessor, inherited by the subtree.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl EventPreprocessor + 'static) -> Self {
        self.preprocessor = Some(Arc::new(preprocessor));
        self
    }

    pub fn id(&self) -> PhaseId {
        self.id
    }

    pub fn condition(&self) -> Option<&ConditionRef> {
        self.condition.as_ref()
    }

    pub fn rule(&self) -> Option<&Arc<dyn Rule>> {
        self.rule.as_ref()
    }

    pub fn children(&self) -> &[PhaseId] {
        &self.children
    }

    pub fn exclusivity_key(&self) -> Option<&str> {
        self.exclusivity_key.as_deref()
    }

    pub fn preprocessor(&self) -> Option<&Arc<dyn EventPreprocessor>> {
        self.preprocessor.as_ref()
    }

    /// True for a node without children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl std::fmt::Debug for PhaseNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseNode")
            .field("id", &self.id)
            .field("gated", &self.condition.is_some())
            .field("rule", &self.rule.as_ref().map(|r| r.name().to_string()))
            .field("children", &self.children)
            .field("exclusivity_key", &self.exclusivity_key)
            .field("preprocessor", &self.preprocessor.is_some())
            .finish()
    }
}

/// Arena of phase nodes plus the ordered list of roots.
#[derive(Clone, Debug, Default)]
pub struct PhaseTree {
    nodes: Vec<PhaseNode>,
    roots: Vec<PhaseId>,
}

impl PhaseTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level phase. Roots are evaluated in insertion order.
    #[must_use]
    pub fn with_root(mut self, node: PhaseNode) -> Self {
        self.roots.push(node.id);
        self.nodes.push(node);
        self
    }

    /// Add a phase that some composite lists as a child.
    #[must_use]
    pub fn with_phase(mut self, node: PhaseNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Root phases in evaluation order.
    pub fn roots(&self) -> &[PhaseId] {
        &self.roots
    }

    /// Every node, in insertion order.
    pub fn nodes(&self) -> &[PhaseNode] {
        &self.nodes
    }

    /// First node with the given id. O(n).
    pub fn get(&self, id: PhaseId) -> Option<&PhaseNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
