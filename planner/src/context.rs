//! World-state contract and the planning bookkeeping the executor shares with
//! the decomposition engine.

use std::fmt;
use std::rc::Rc;

use crate::core::record::TraversalRecord;
use crate::task::CompoundTask;

/// Resumption point of a partially executed plan: the compound task to resume
/// from and the index of its next child.
///
/// Parent and index live in one value so they are always set or cleared together.
pub struct PartialPlan<C> {
    pub parent: Rc<CompoundTask<C>>,
    pub child_index: usize,
}

impl<C> PartialPlan<C> {
    pub fn new(parent: Rc<CompoundTask<C>>, child_index: usize) -> Self {
        Self {
            parent,
            child_index,
        }
    }
}

impl<C> Clone for PartialPlan<C> {
    fn clone(&self) -> Self {
        Self {
            parent: Rc::clone(&self.parent),
            child_index: self.child_index,
        }
    }
}

/// Two resumption points are equal when they name the same task instance.
impl<C> PartialEq for PartialPlan<C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.parent, &other.parent) && self.child_index == other.child_index
    }
}

impl<C> fmt::Debug for PartialPlan<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialPlan")
            .field("parent", &self.parent.name())
            .field("child_index", &self.child_index)
            .finish()
    }
}

/// Planning bookkeeping embedded in every context.
///
/// `dirty` is owned by the caller (set it whenever planning-relevant world state
/// changes). Everything else is owned by the executor and the decomposition
/// engine and must not be touched by the caller.
pub struct PlanningState<C> {
    /// World state changed since the last replan evaluation.
    pub dirty: bool,
    /// Where an in-flight plan continues inside the task hierarchy.
    pub partial_plan: Option<PartialPlan<C>>,
    /// Method traversal record of the last successful decomposition.
    pub mtr: TraversalRecord,
    /// Baseline record a new decomposition must beat to replace the running plan.
    pub last_mtr: TraversalRecord,
}

impl<C> Default for PlanningState<C> {
    fn default() -> Self {
        Self {
            dirty: false,
            partial_plan: None,
            mtr: TraversalRecord::default(),
            last_mtr: TraversalRecord::default(),
        }
    }
}

impl<C> fmt::Debug for PlanningState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningState")
            .field("dirty", &self.dirty)
            .field("partial_plan", &self.partial_plan)
            .field("mtr", &self.mtr)
            .field("last_mtr", &self.last_mtr)
            .finish()
    }
}

/// Capability implemented by the caller's world-state type.
///
/// The executor only touches the planning block; conditions, effects, and
/// operators see the full concrete type.
pub trait Context: Sized {
    fn planning(&self) -> &PlanningState<Self>;

    fn planning_mut(&mut self) -> &mut PlanningState<Self>;

    fn is_dirty(&self) -> bool {
        self.planning().dirty
    }

    /// Request a replan evaluation on the next tick.
    fn mark_dirty(&mut self) {
        self.planning_mut().dirty = true;
    }
}
