//! Compiled games.

use std::sync::Arc;

use crate::bitboard::{BitboardLayout, BitboardSnapshot};
use crate::core::{CompileResult, EngineConfig, GameDefinition, GameState};
use crate::movement::{CompiledPatternTable, SlidingAttackTable};
use crate::plan::{DecisionPlan, PhaseTree};
use crate::topology::BoardShape;

/// Everything derived from a game definition and phase tree at build time.
///
/// Built once, then shared read-only (`Arc<CompiledGame>`) by every
/// `GameProgress` of that game.
pub struct CompiledGame {
    definition: GameDefinition,
    config: EngineConfig,
    shape: BoardShape,
    layout: BitboardLayout,
    rays: SlidingAttackTable,
    patterns: CompiledPatternTable,
    tree: PhaseTree,
    plan: DecisionPlan,
}

impl CompiledGame {
    /// Validate and compile a game.
    ///
    /// Fails on a malformed artifact graph or phase tree. Unsupported
    /// movement patterns and an exhausted ray budget are logged, not errors.
    pub fn build(definition: GameDefinition, tree: PhaseTree, config: EngineConfig) -> CompileResult<Arc<Self>> {
        let shape = BoardShape::build(&definition)?;
        let layout = BitboardLayout::build(&definition)?;
        let plan = DecisionPlan::compile(&tree)?;
        let rays = SlidingAttackTable::build(&shape, &config);
        let patterns = CompiledPatternTable::compile(&definition, &shape);

        tracing::debug!(
            tiles = shape.tile_count(),
            directions = shape.direction_count(),
            pieces = layout.piece_count(),
            ray_slots = rays.total_slots(),
            unsupported_patterns = patterns.unsupported_count(),
            plan_entries = plan.len(),
            "compiled game"
        );

        Ok(Arc::new(Self {
            definition,
            config,
            shape,
            layout,
            rays,
            patterns,
            tree,
            plan,
        }))
    }

    pub fn definition(&self) -> &GameDefinition {
        &self.definition
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn shape(&self) -> &BoardShape {
        &self.shape
    }

    pub fn layout(&self) -> &BitboardLayout {
        &self.layout
    }

    pub fn rays(&self) -> &SlidingAttackTable {
        &self.rays
    }

    pub fn patterns(&self) -> &CompiledPatternTable {
        &self.patterns
    }

    pub fn tree(&self) -> &PhaseTree {
        &self.tree
    }

    pub fn plan(&self) -> &DecisionPlan {
        &self.plan
    }

    /// Full snapshot rebuild.
    pub fn snapshot(&self, state: &GameState) -> BitboardSnapshot {
        BitboardSnapshot::build(&self.layout, state, &self.shape)
    }

    /// Snapshot of `next`, given the snapshot of `prev`.
    ///
    /// Patches `prev_snapshot` from the state diff when incremental snapshots
    /// are enabled, rebuilds otherwise. Both give identical results.
    pub fn advance_snapshot(
        &self,
        prev: &GameState,
        prev_snapshot: &BitboardSnapshot,
        next: &GameState,
    ) -> BitboardSnapshot {
        if !self.config.incremental_snapshots {
            return self.snapshot(next);
        }
        let delta = prev.diff(next);
        tracing::trace!(changes = delta.len(), "patching snapshot");
        prev_snapshot.patched(&self.layout, &self.shape, &delta)
    }
}

impl std::fmt::Debug for CompiledGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGame")
            .field("tiles", &self.shape.tile_count())
            .field("directions", &self.shape.direction_count())
            .field("pieces", &self.layout.piece_count())
            .field("plan_entries", &self.plan.len())
            .field("config", &self.config)
            .finish()
    }
}
