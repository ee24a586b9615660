//! Per-tick execution core for a hierarchical task network (HTN) planner.
//!
//! A [`executor::Planner`] owns the plan that is currently running for one agent.
//! Each call to [`executor::Planner::tick`] decides whether to keep executing,
//! replan from the domain root, or fall back to the partial plan that was
//! already in flight, and then advances the active primitive task by one step.
//!
//! - **[`core`]**: Pure, deterministic logic (traversal records, the replan
//!   transaction, plan shape checks). No logging, fully testable in isolation.
//! - **[`task`]**, **[`context`]**, **[`domain`]**: Collaborator contracts the
//!   executor depends on. Finding plans is the domain's job, not this crate's.
//! - **[`executor`]**: The tick loop itself.

pub mod config;
pub mod context;
pub mod core;
pub mod domain;
pub mod executor;
pub mod logging;
pub mod task;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
