//! Shared deterministic types for planner core logic.

/// Status reported by an operator after one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The operator finished; execution-time effects are applied.
    Success,
    /// The operator gave up; the whole plan is discarded.
    Failure,
    /// The operator needs more ticks.
    Continue,
}

/// When an effect is applied to the world state.
///
/// The executor only ever applies [`EffectType::PlanAndExecute`]. The other
/// kinds are owned by the decomposition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectType {
    /// Applied during planning and again when the task succeeds.
    PlanAndExecute,
    /// Applied during planning only.
    PlanOnly,
    /// Applied during planning and kept permanently; never re-applied on success.
    Permanent,
}

impl EffectType {
    /// True if the executor applies this effect when its task succeeds.
    pub fn applies_on_success(self) -> bool {
        matches!(self, EffectType::PlanAndExecute)
    }
}
