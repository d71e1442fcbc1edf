//! Phase tree to decision plan compilation.
//!
//! The plan is the tree's leaves in depth-first order, plus gate groups:
//!
//! - a *scope group* per gated composite, covering its subtree's entries
//! - a *shared group* per maximal run of adjacent leaves holding the same
//!   condition `Arc`
//!
//! Groups are sorted by (start ascending, end descending) so an enclosing
//! group comes before the groups inside it. Each entry lists the groups that
//! gate it in that order.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::core::{CompileError, CompileResult, EventKind};
use crate::rules::{ConditionRef, Rule};

use super::phase::{EventPreprocessor, PhaseId, PhaseNode, PhaseTree};

/// Number of distinct exclusivity keys a plan can hold.
pub const MAX_EXCLUSIVITY_KEYS: usize = u64::BITS as usize;

/// One leaf of the phase tree.
#[derive(Clone)]
pub struct DecisionPlanEntry {
    pub phase: PhaseId,
    /// The leaf's own condition, if any. Evaluated through its shared group.
    pub condition: Option<ConditionRef>,
    pub rule: Arc<dyn Rule>,
    /// No gate on the path from the root can fail.
    pub always_valid: bool,
    /// Bit of the inherited exclusivity key, or 0.
    pub exclusivity: u64,
    /// Snapshot of `rule.event_kinds()`.
    pub event_kinds: Option<SmallVec<[EventKind; 4]>>,
    /// Indices into `DecisionPlan::groups`, enclosing groups first.
    pub gates: SmallVec<[u32; 4]>,
    /// Inherited event preprocessor.
    pub preprocessor: Option<Arc<dyn EventPreprocessor>>,
}

impl DecisionPlanEntry {
    /// True if the rule may handle `kind`.
    #[inline]
    #[must_use]
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.event_kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }
}

impl std::fmt::Debug for DecisionPlanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionPlanEntry")
            .field("phase", &self.phase)
            .field("rule", &self.rule.name())
            .field("always_valid", &self.always_valid)
            .field("exclusivity", &format_args!("{:#x}", self.exclusivity))
            .field("event_kinds", &self.event_kinds)
            .field("gates", &self.gates)
            .finish_non_exhaustive()
    }
}

/// Where a group comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupOrigin {
    /// The condition of a composite phase.
    Scope(PhaseId),
    /// A condition shared by adjacent leaves.
    Shared,
}

/// A contiguous entry range behind one condition.
#[derive(Clone)]
pub struct DecisionPlanGroup {
    /// First entry.
    pub start: usize,
    /// One past the last entry.
    pub end: usize,
    pub condition: ConditionRef,
    pub origin: GroupOrigin,
    /// Union of the members' exclusivity bits if every member has one, else 0.
    pub exclusivity_mask: u64,
}

impl DecisionPlanGroup {
    /// Number of entries in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for an empty range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl std::fmt::Debug for DecisionPlanGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionPlanGroup")
            .field("range", &(self.start..self.end))
            .field("origin", &self.origin)
            .field("exclusivity_mask", &format_args!("{:#x}", self.exclusivity_mask))
            .finish_non_exhaustive()
    }
}

/// Flattened, grouped evaluation plan.
#[derive(Clone, Debug, Default)]
pub struct DecisionPlan {
    entries: Vec<DecisionPlanEntry>,
    groups: Vec<DecisionPlanGroup>,
    exclusivity_keys: Vec<String>,
    has_preprocessors: bool,
}

impl DecisionPlan {
    /// Compile a phase tree.
    ///
    /// Fails on duplicate ids, unknown children, nodes with more than one
    /// parent, cycles, leaves without a rule, an empty tree, and more than
    /// [`MAX_EXCLUSIVITY_KEYS`] exclusivity keys.
    pub fn compile(tree: &PhaseTree) -> CompileResult<Self> {
        let nodes = index_nodes(tree)?;
        check_structure(tree, &nodes)?;

        let mut flattener = Flattener {
            tree,
            nodes: &nodes,
            entries: Vec::new(),
            groups: Vec::new(),
            keys: Vec::new(),
        };
        for root in tree.roots() {
            flattener.visit(*root, Inherited::default())?;
        }

        let Flattener {
            mut entries,
            mut groups,
            keys,
            ..
        } = flattener;
        groups.extend(shared_groups(&entries));
        groups.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        for (index, group) in groups.iter_mut().enumerate() {
            let members = &mut entries[group.start..group.end];
            for entry in members.iter_mut() {
                entry.gates.push(index as u32);
            }
            if members.iter().all(|entry| entry.exclusivity != 0) {
                group.exclusivity_mask = members.iter().fold(0, |mask, entry| mask | entry.exclusivity);
            }
        }
        for entry in &mut entries {
            entry.always_valid = entry.gates.is_empty();
        }

        let has_preprocessors = entries.iter().any(|entry| entry.preprocessor.is_some());

        tracing::debug!(
            entries = entries.len(),
            groups = groups.len(),
            exclusivity_keys = keys.len(),
            has_preprocessors,
            "compiled decision plan"
        );

        Ok(Self {
            entries,
            groups,
            exclusivity_keys: keys,
            has_preprocessors,
        })
    }

    /// Entries in evaluation order.
    pub fn entries(&self) -> &[DecisionPlanEntry] {
        &self.entries
    }

    /// Groups sorted by (start, end descending).
    pub fn groups(&self) -> &[DecisionPlanGroup] {
        &self.groups
    }

    /// Exclusivity keys; key `i` owns bit `1 << i`.
    pub fn exclusivity_keys(&self) -> &[String] {
        &self.exclusivity_keys
    }

    /// Mask bit of an exclusivity key.
    #[must_use]
    pub fn exclusivity_bit(&self, key: &str) -> Option<u64> {
        self.exclusivity_keys
            .iter()
            .position(|k| k == key)
            .map(|i| 1u64 << i)
    }

    /// True if at least one entry has a preprocessor.
    #[must_use]
    pub fn has_preprocessors(&self) -> bool {
        self.has_preprocessors
    }

    /// Phase ids in evaluation order.
    pub fn phase_order(&self) -> impl Iterator<Item = PhaseId> + '_ {
        self.entries.iter().map(|entry| entry.phase)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for a plan without entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn index_nodes(tree: &PhaseTree) -> CompileResult<FxHashMap<PhaseId, usize>> {
    if tree.roots().is_empty() {
        return Err(CompileError::EmptyTree);
    }
    let mut nodes = FxHashMap::default();
    for (i, node) in tree.nodes().iter().enumerate() {
        if nodes.insert(node.id(), i).is_some() {
            return Err(CompileError::DuplicatePhase(node.id()));
        }
    }
    Ok(nodes)
}

fn check_structure(tree: &PhaseTree, nodes: &FxHashMap<PhaseId, usize>) -> CompileResult<()> {
    let mut parented: FxHashSet<PhaseId> = tree.roots().iter().copied().collect();
    for node in tree.nodes() {
        if node.is_leaf() && node.rule().is_none() {
            return Err(CompileError::MissingRule(node.id()));
        }
        for child in node.children() {
            if !nodes.contains_key(child) {
                return Err(CompileError::UnknownPhase {
                    parent: node.id(),
                    child: *child,
                });
            }
            if *child == node.id() {
                return Err(CompileError::PhaseCycle(*child));
            }
            if !parented.insert(*child) {
                return Err(CompileError::SharedPhase(*child));
            }
        }
    }

    // With at most one parent per node, a cycle is a chain of parents that
    // loops. Walk every node's parent chain with a three-color marking.
    let mut parent: FxHashMap<PhaseId, PhaseId> = FxHashMap::default();
    for node in tree.nodes() {
        for child in node.children() {
            parent.insert(*child, node.id());
        }
    }
    let mut done: FxHashSet<PhaseId> = FxHashSet::default();
    for node in tree.nodes() {
        let mut chain: SmallVec<[PhaseId; 16]> = SmallVec::new();
        let mut current = node.id();
        loop {
            if done.contains(&current) {
                break;
            }
            if chain.contains(&current) {
                return Err(CompileError::PhaseCycle(current));
            }
            chain.push(current);
            match parent.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        done.extend(chain);
    }
    Ok(())
}

#[derive(Clone, Default)]
struct Inherited {
    exclusivity: u64,
    preprocessor: Option<Arc<dyn EventPreprocessor>>,
}

struct Flattener<'a> {
    tree: &'a PhaseTree,
    nodes: &'a FxHashMap<PhaseId, usize>,
    entries: Vec<DecisionPlanEntry>,
    groups: Vec<DecisionPlanGroup>,
    keys: Vec<String>,
}

impl Flattener<'_> {
    fn node(&self, id: PhaseId) -> &PhaseNode {
        &self.tree.nodes()[self.nodes[&id]]
    }

    fn key_bit(&mut self, key: &str) -> CompileResult<u64> {
        let index = match self.keys.iter().position(|k| k == key) {
            Some(index) => index,
            None => {
                if self.keys.len() == MAX_EXCLUSIVITY_KEYS {
                    return Err(CompileError::TooManyExclusivityKeys {
                        limit: MAX_EXCLUSIVITY_KEYS,
                    });
                }
                self.keys.push(key.to_string());
                self.keys.len() - 1
            }
        };
        Ok(1u64 << index)
    }

    fn visit(&mut self, id: PhaseId, inherited: Inherited) -> CompileResult<()> {
        let node = self.node(id).clone();
        let mut inherited = inherited;
        if let Some(key) = node.exclusivity_key() {
            inherited.exclusivity = self.key_bit(key)?;
        }
        if let Some(preprocessor) = node.preprocessor() {
            inherited.preprocessor = Some(preprocessor.clone());
        }

        if node.is_leaf() {
            let Some(rule) = node.rule().cloned() else {
                return Err(CompileError::MissingRule(id));
            };
            let event_kinds = rule.event_kinds().map(|kinds| kinds.iter().copied().collect());
            self.entries.push(DecisionPlanEntry {
                phase: id,
                condition: node.condition().cloned(),
                rule,
                always_valid: true,
                exclusivity: inherited.exclusivity,
                event_kinds,
                gates: SmallVec::new(),
                preprocessor: inherited.preprocessor,
            });
            return Ok(());
        }

        let start = self.entries.len();
        for child in node.children() {
            self.visit(*child, inherited.clone())?;
        }
        let end = self.entries.len();

        if let Some(condition) = node.condition() {
            if !condition.is_always_valid() && end > start {
                self.groups.push(DecisionPlanGroup {
                    start,
                    end,
                    condition: condition.clone(),
                    origin: GroupOrigin::Scope(id),
                    exclusivity_mask: 0,
                });
            }
        }
        Ok(())
    }
}

/// Maximal runs of adjacent entries holding the same condition `Arc`.
fn shared_groups(entries: &[DecisionPlanEntry]) -> Vec<DecisionPlanGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let Some(condition) = entries[i].condition.as_ref().filter(|c| !c.is_always_valid()) else {
            i += 1;
            continue;
        };
        let mut end = i + 1;
        while end < entries.len()
            && entries[end]
                .condition
                .as_ref()
                .is_some_and(|other| Arc::ptr_eq(condition, other))
        {
            end += 1;
        }
        groups.push(DecisionPlanGroup {
            start: i,
            end,
            condition: condition.clone(),
            origin: GroupOrigin::Shared,
            exclusivity_mask: 0,
        });
        i = end;
    }
    groups
}
