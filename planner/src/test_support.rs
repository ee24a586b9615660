//! Test-only collaborators: a scripted domain, a scripted operator, and a small
//! world-state type that records which effects were applied.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use crate::context::{Context, PlanningState};
use crate::core::record::TraversalRecord;
use crate::core::types::{EffectType, TaskStatus};
use crate::domain::{Domain, Plan};
use crate::task::{ActionEffect, FuncCondition, Operator, PrimitiveTask, Task};

/// Minimal world state: a set of facts plus a log of applied effects.
#[derive(Debug, Default)]
pub struct TestWorld {
    pub planning: PlanningState<TestWorld>,
    pub facts: BTreeSet<String>,
    pub applied: Vec<String>,
}

impl TestWorld {
    pub fn with_facts(facts: &[&str]) -> Self {
        Self {
            facts: facts.iter().map(|fact| fact.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn has(&self, fact: &str) -> bool {
        self.facts.contains(fact)
    }
}

impl Context for TestWorld {
    fn planning(&self) -> &PlanningState<Self> {
        &self.planning
    }

    fn planning_mut(&mut self) -> &mut PlanningState<Self> {
        &mut self.planning
    }
}

#[derive(Debug)]
struct OperatorState {
    statuses: VecDeque<TaskStatus>,
    last: TaskStatus,
    updates: usize,
    stops: usize,
}

/// Operator that replays queued statuses, then repeats the last one.
///
/// Clones share counters, so one handle can be kept by the test while others
/// sit inside tasks.
#[derive(Debug, Clone)]
pub struct ScriptedOperator {
    state: Rc<RefCell<OperatorState>>,
}

impl ScriptedOperator {
    pub fn new(statuses: Vec<TaskStatus>) -> Self {
        let last = statuses.last().copied().unwrap_or(TaskStatus::Continue);
        Self {
            state: Rc::new(RefCell::new(OperatorState {
                statuses: statuses.into(),
                last,
                updates: 0,
                stops: 0,
            })),
        }
    }

    pub fn updates(&self) -> usize {
        self.state.borrow().updates
    }

    pub fn stops(&self) -> usize {
        self.state.borrow().stops
    }
}

impl<C> Operator<C> for ScriptedOperator {
    fn update(&self, _ctx: &mut C) -> TaskStatus {
        let mut state = self.state.borrow_mut();
        state.updates += 1;
        let last = state.last;
        state.statuses.pop_front().unwrap_or(last)
    }

    fn stop(&self, _ctx: &mut C) {
        self.state.borrow_mut().stops += 1;
    }
}

/// Domain that hands out predetermined results instead of decomposing.
pub struct ScriptedDomain<C> {
    results: RefCell<VecDeque<Option<Vec<Task<C>>>>>,
    repeat: Option<Vec<Task<C>>>,
    mtr: Option<TraversalRecord>,
    calls: Cell<usize>,
    observed_partial_plans: RefCell<Vec<Option<usize>>>,
}

impl<C> ScriptedDomain<C> {
    /// Return `results` one per call, then `None` forever.
    pub fn new(results: Vec<Option<Vec<Task<C>>>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            repeat: None,
            mtr: None,
            calls: Cell::new(0),
            observed_partial_plans: RefCell::new(Vec::new()),
        }
    }

    /// Return a fresh copy of `tasks` on every call.
    pub fn repeating(tasks: Vec<Task<C>>) -> Self {
        Self {
            repeat: Some(tasks),
            ..Self::new(Vec::new())
        }
    }

    /// Record written into the context whenever a plan is returned.
    pub fn with_mtr(mut self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.mtr = Some(TraversalRecord::from_choices(choices));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Resumption child index visible to the engine on each call.
    pub fn observed_partial_plans(&self) -> Vec<Option<usize>> {
        self.observed_partial_plans.borrow().clone()
    }
}

impl<C: Context> Domain<C> for ScriptedDomain<C> {
    fn find_plan(&self, ctx: &mut C) -> Option<Plan<C>> {
        self.calls.set(self.calls.get() + 1);
        self.observed_partial_plans.borrow_mut().push(
            ctx.planning()
                .partial_plan
                .as_ref()
                .map(|partial| partial.child_index),
        );

        let next = self
            .results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.repeat.clone());
        let tasks = next?;
        if let Some(mtr) = &self.mtr {
            ctx.planning_mut().mtr.copy_from(mtr);
        }
        Some(tasks.into_iter().collect())
    }
}

/// Primitive task driven by `operator` with the given effects and no conditions.
pub fn task_with(
    name: &str,
    operator: &ScriptedOperator,
    effects: Vec<ActionEffect<TestWorld>>,
) -> Task<TestWorld> {
    let task = effects.into_iter().fold(
        PrimitiveTask::<TestWorld>::new(name).with_operator(operator.clone()),
        |task, effect| task.with_effect(effect),
    );
    task.into()
}

/// Effect that appends its name to [`TestWorld::applied`].
pub fn effect(name: &str, effect_type: EffectType) -> ActionEffect<TestWorld> {
    let label = name.to_string();
    ActionEffect::new(name, effect_type, move |world: &mut TestWorld| {
        world.applied.push(label.clone());
    })
}

/// Condition that holds while `fact` is present.
pub fn requires(fact: &str) -> FuncCondition<TestWorld> {
    let fact_name = fact.to_string();
    FuncCondition::new(fact, move |world: &TestWorld| world.has(&fact_name))
}
