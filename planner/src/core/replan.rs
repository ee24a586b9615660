//! Replan attempt as a two-phase transaction over the planning bookkeeping.
//!
//! A replan may try to beat the partial plan that is already running. The
//! attempt snapshots the resumption point, lets the engine search, and then
//! either commits the engine's traversal record as the new baseline or rolls
//! the bookkeeping back to exactly what it was before the attempt.

use crate::context::{PartialPlan, PlanningState};

/// Result of rolling back an attempt that found no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    /// A partial plan was in flight; its resumption point and record are back.
    Restored,
    /// Nothing was running, so there was nothing to restore.
    Idle,
}

/// Open replan attempt. Close it with [`ReplanAttempt::commit`] or
/// [`ReplanAttempt::rollback`].
#[must_use]
pub struct ReplanAttempt<C> {
    saved: Option<PartialPlan<C>>,
    soft: bool,
}

impl<C> ReplanAttempt<C> {
    /// Snapshot the resumption point and consume the dirty flag.
    ///
    /// A dirty-triggered ("soft") attempt decomposes from the domain root, so
    /// the resumption point is cleared for the duration of the search. If a
    /// partial plan was in flight, its record is copied into `last_mtr` as the
    /// baseline any new plan has to beat.
    pub fn begin(state: &mut PlanningState<C>) -> Self {
        let saved = state.partial_plan.clone();
        let soft = state.dirty;
        state.dirty = false;

        if soft {
            state.partial_plan = None;
            if saved.is_some() {
                state.last_mtr.copy_from(&state.mtr);
            }
        }

        Self { saved, soft }
    }

    /// True if the attempt was triggered by a world-state change.
    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn had_partial_plan(&self) -> bool {
        self.saved.is_some()
    }

    /// The engine produced a plan: its record becomes the new baseline.
    pub fn commit(self, state: &mut PlanningState<C>) {
        state.last_mtr.copy_from(&state.mtr);
    }

    /// The engine produced nothing: put back the partial plan that was running.
    pub fn rollback(self, state: &mut PlanningState<C>) -> Rollback {
        let Some(saved) = self.saved else {
            return Rollback::Idle;
        };

        state.partial_plan = Some(saved);
        if !state.last_mtr.is_empty() {
            state.mtr.copy_from(&state.last_mtr);
            state.last_mtr.clear();
        }
        Rollback::Restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::TraversalRecord;
    use crate::task::CompoundTask;
    use std::rc::Rc;

    fn running_state() -> PlanningState<()> {
        let parent = Rc::new(CompoundTask::new("root"));
        let mut mtr = TraversalRecord::from_choices([0, 2]);
        mtr.push_label("root:0");
        PlanningState {
            dirty: true,
            partial_plan: Some(PartialPlan::new(parent, 3)),
            mtr,
            last_mtr: TraversalRecord::default(),
        }
    }

    #[test]
    fn soft_begin_clears_resumption_point_and_snapshots_record() {
        let mut state = running_state();
        let attempt = ReplanAttempt::begin(&mut state);

        assert!(attempt.is_soft());
        assert!(attempt.had_partial_plan());
        assert!(!state.dirty);
        assert!(state.partial_plan.is_none());
        assert_eq!(state.last_mtr, state.mtr);
        attempt.commit(&mut state);
    }

    #[test]
    fn hard_begin_keeps_resumption_point() {
        let mut state = running_state();
        state.dirty = false;
        let before = state.partial_plan.clone();

        let attempt = ReplanAttempt::begin(&mut state);

        assert!(!attempt.is_soft());
        assert_eq!(state.partial_plan, before);
        assert!(state.last_mtr.is_empty());
        assert_eq!(attempt.rollback(&mut state), Rollback::Restored);
    }

    /// Rollback returns the bookkeeping to exactly its pre-attempt shape, even
    /// when the engine scribbled over the record during a failed search.
    #[test]
    fn rollback_restores_resumption_point_and_record() {
        let mut state = running_state();
        let partial_before = state.partial_plan.clone();
        let mtr_before = state.mtr.clone();

        let attempt = ReplanAttempt::begin(&mut state);
        state.mtr = TraversalRecord::from_choices([1]);

        assert_eq!(attempt.rollback(&mut state), Rollback::Restored);
        assert_eq!(state.partial_plan, partial_before);
        assert_eq!(state.mtr, mtr_before);
        assert!(state.last_mtr.is_empty());
        assert!(!state.dirty);
    }

    #[test]
    fn rollback_without_partial_plan_is_idle() {
        let mut state = PlanningState::<()> {
            dirty: true,
            ..PlanningState::default()
        };

        let attempt = ReplanAttempt::begin(&mut state);
        assert!(!attempt.had_partial_plan());
        assert_eq!(attempt.rollback(&mut state), Rollback::Idle);
        assert!(state.partial_plan.is_none());
        assert!(state.mtr.is_empty());
    }

    #[test]
    fn commit_copies_engine_record_into_baseline() {
        let mut state = running_state();
        let attempt = ReplanAttempt::begin(&mut state);
        state.mtr = TraversalRecord::from_choices([0, 1, 1]);

        attempt.commit(&mut state);

        assert_eq!(state.last_mtr.choices(), &[0, 1, 1]);
        assert_eq!(state.mtr.choices(), &[0, 1, 1]);
    }
}
