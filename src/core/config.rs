//! Build-time engine configuration.
//!
//! Every acceleration toggle lives here. A config is handed to
//! `CompiledGame::build` once and is immutable afterwards; nothing reads a
//! toggle from global state during evaluation.

use serde::{Deserialize, Serialize};

/// Default upper bound on the total number of sliding-ray slots.
pub const DEFAULT_MAX_RAY_SLOTS: usize = 1 << 20;

/// Engine feature toggles and resource bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Skip plan entries whose rule cannot handle the event kind before
    /// calling `Rule::check`. Never changes which entry applies.
    pub kind_filtering: bool,

    /// Patch snapshots from the state diff instead of rebuilding them.
    pub incremental_snapshots: bool,

    /// Resolve movement through compiled pattern tables.
    /// When false, every query goes through the legacy visitor.
    pub compiled_patterns: bool,

    /// Total slot budget for the sliding attack table.
    /// Exceeding it yields an empty table.
    pub max_ray_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind_filtering: true,
            incremental_snapshots: true,
            compiled_patterns: true,
            max_ray_slots: DEFAULT_MAX_RAY_SLOTS,
        }
    }
}

impl EngineConfig {
    /// Configuration with every acceleration disabled.
    ///
    /// Useful as the reference side of parity comparisons.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            kind_filtering: false,
            incremental_snapshots: false,
            compiled_patterns: false,
            max_ray_slots: DEFAULT_MAX_RAY_SLOTS,
        }
    }

    /// Enable or disable event kind filtering.
    #[must_use]
    pub fn with_kind_filtering(mut self, enabled: bool) -> Self {
        self.kind_filtering = enabled;
        self
    }

    /// Enable or disable incremental snapshot patching.
    #[must_use]
    pub fn with_incremental_snapshots(mut self, enabled: bool) -> Self {
        self.incremental_snapshots = enabled;
        self
    }

    /// Enable or disable compiled pattern resolution.
    #[must_use]
    pub fn with_compiled_patterns(mut self, enabled: bool) -> Self {
        self.compiled_patterns = enabled;
        self
    }

    /// Set the sliding ray slot budget.
    #[must_use]
    pub fn with_max_ray_slots(mut self, slots: usize) -> Self {
        self.max_ray_slots = slots;
        self
    }
}
