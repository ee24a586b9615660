//! Decomposition engine boundary.
//!
//! The [`Domain`] trait decouples the tick loop from the search that turns a
//! task hierarchy into a plan. Tests use scripted domains that return
//! predetermined plans without decomposing anything.

use std::collections::VecDeque;

use crate::task::Task;

/// Ordered tasks consumed front to back.
pub type Plan<C> = VecDeque<Task<C>>;

/// Produces plans from a goal hierarchy and the current world state.
pub trait Domain<C> {
    /// Decompose from the domain root, or from `ctx.planning().partial_plan`
    /// when set. Returns `None` when no plan (or no better plan) exists.
    ///
    /// On success the engine leaves the chosen method traversal record in
    /// `ctx.planning().mtr`. Implementations must be safe to call every tick.
    fn find_plan(&self, ctx: &mut C) -> Option<Plan<C>>;
}
