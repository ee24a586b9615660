//! Deterministic, pure logic shared by the planner.
//!
//! Core modules must be free of I/O and logging side effects. They operate on
//! in-memory data structures and return deterministic outputs suitable for tests.

pub mod invariants;
pub mod record;
pub mod replan;
pub mod types;
