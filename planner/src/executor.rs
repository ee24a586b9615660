//! The per-tick plan executor.
//!
//! Each [`Planner::tick`] runs the same procedure:
//!
//! 1. Replan if nothing is running or the world state is dirty. A failed
//!    attempt to beat a running partial plan leaves that plan untouched.
//! 2. If no task is active, dequeue the next one and check its conditions. A
//!    failing condition discards the whole plan; the replan happens next tick.
//! 3. Update the active primitive task's operator once. On success, apply its
//!    execution-time effects; if that finished the plan, go back to step 1
//!    within the same call instead of idling for a tick.

use tracing::{debug, instrument, warn};

use crate::config::{MissingOperatorPolicy, PlannerConfig};
use crate::context::Context;
use crate::core::invariants::validate_plan;
use crate::core::replan::{ReplanAttempt, Rollback};
use crate::core::types::TaskStatus;
use crate::domain::{Domain, Plan};
use crate::task::Task;

/// Notable transitions, reported to an optional listener in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerEvent {
    /// A new plan replaced whatever was queued. `replaced` names the task that
    /// was stopped mid-flight, if one was running.
    PlanAdopted {
        tasks: Vec<String>,
        replaced: Option<String>,
    },
    /// A replan found nothing better; the running partial plan was kept.
    PlanRestored,
    /// A task was dequeued and passed its conditions.
    NewTask { task: String },
    /// A dequeued task failed a condition and the plan was discarded.
    ConditionFailed { task: String, condition: String },
    EffectApplied { task: String, effect: String },
    TaskSucceeded { task: String },
    /// The operator failed and the plan was discarded.
    TaskFailed { task: String },
    TaskContinues { task: String },
    /// The active task could not be run (no operator, or not primitive).
    MissingOperator { task: String },
    /// The last task of the plan succeeded.
    PlanCompleted,
}

type Listener = Box<dyn FnMut(&PlannerEvent)>;

/// How one pass through the tick procedure ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Nothing more to do until the next tick.
    Yield,
    /// The plan just finished; run another pass immediately.
    PlanCompleted,
}

/// Executes plans for a single agent.
///
/// The planner owns the plan queue and the active task; the context owns the
/// world state and planning bookkeeping. One planner pairs with one context.
pub struct Planner<C> {
    plan: Plan<C>,
    current_task: Option<Task<C>>,
    config: PlannerConfig,
    listener: Option<Listener>,
}

impl<C> Default for Planner<C> {
    fn default() -> Self {
        Self::with_config(PlannerConfig::default())
    }
}

impl<C> Planner<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            plan: Plan::new(),
            current_task: None,
            config,
            listener: None,
        }
    }

    /// Report [`PlannerEvent`]s to `listener`.
    pub fn with_listener(mut self, listener: impl FnMut(&PlannerEvent) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Task being executed, if any.
    pub fn current_task(&self) -> Option<&Task<C>> {
        self.current_task.as_ref()
    }

    /// Tasks still queued behind the current one, front first.
    pub fn plan(&self) -> &Plan<C> {
        &self.plan
    }

    /// True when nothing is running and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.current_task.is_none() && self.plan.is_empty()
    }

    fn emit(&mut self, event: PlannerEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

impl<C: Context> Planner<C> {
    /// Advance the agent by one logical step.
    ///
    /// Never blocks. If a plan completes during this call, the next plan is
    /// looked up and started before returning, up to
    /// [`PlannerConfig::max_chained_plans`] times (at least once). Past that
    /// limit the engine is still consulted, but the new plan only starts on
    /// the next call.
    #[instrument(skip_all)]
    pub fn tick<D>(&mut self, domain: &D, ctx: &mut C)
    where
        D: Domain<C> + ?Sized,
    {
        let limit = self.config.max_chained_plans.max(1);
        let mut completed = 0u32;
        while self.pass(domain, ctx) == Pass::PlanCompleted {
            completed += 1;
            if completed > limit {
                debug!(completed, "chained plan limit reached, deferring next plan");
                if self.needs_replan(ctx) {
                    self.replan(domain, ctx);
                }
                return;
            }
        }
    }

    /// Stop the running task and drop the plan and all decomposition state.
    ///
    /// The next tick plans from the domain root.
    pub fn reset(&mut self, ctx: &mut C) {
        if let Some(task) = self.current_task.take() {
            stop_task(&task, ctx);
        }
        self.plan.clear();

        let planning = ctx.planning_mut();
        planning.partial_plan = None;
        planning.mtr.clear();
        planning.last_mtr.clear();
        debug!("planner reset");
    }

    fn pass<D>(&mut self, domain: &D, ctx: &mut C) -> Pass
    where
        D: Domain<C> + ?Sized,
    {
        if self.needs_replan(ctx) {
            self.replan(domain, ctx);
        }

        if self.current_task.is_none() {
            if let Some(task) = self.plan.pop_front() {
                if !self.start_task(task, ctx) {
                    return Pass::Yield;
                }
            }
        }

        self.execute_current(ctx)
    }

    fn needs_replan(&self, ctx: &C) -> bool {
        self.is_idle() || ctx.is_dirty()
    }

    fn replan<D>(&mut self, domain: &D, ctx: &mut C)
    where
        D: Domain<C> + ?Sized,
    {
        let attempt = ReplanAttempt::begin(ctx.planning_mut());
        let soft = attempt.is_soft();
        let in_flight = !self.is_idle();

        match domain.find_plan(ctx) {
            Some(plan) => {
                self.adopt(plan, ctx);
                attempt.commit(ctx.planning_mut());
            }
            None => {
                let restored = attempt.rollback(ctx.planning_mut()) == Rollback::Restored;
                // An idle planner resuming from a stored point has nothing running to keep.
                if restored && (soft || in_flight) {
                    debug!(soft, "no better plan found, keeping partial plan");
                    self.emit(PlannerEvent::PlanRestored);
                }
            }
        }
    }

    fn adopt(&mut self, plan: Plan<C>, ctx: &mut C) {
        if self.config.validate_plans {
            for error in validate_plan(&plan) {
                warn!(%error, "adopting malformed plan");
            }
        }

        let replaced = self.current_task.take().map(|task| {
            stop_task(&task, ctx);
            task.name().to_string()
        });

        let tasks: Vec<String> = plan.iter().map(|task| task.name().to_string()).collect();
        debug!(tasks = tasks.len(), replaced = ?replaced, "adopted new plan");
        self.plan = plan;
        self.emit(PlannerEvent::PlanAdopted { tasks, replaced });
    }

    /// Make `task` current if its conditions hold. Otherwise abort the plan.
    fn start_task(&mut self, task: Task<C>, ctx: &mut C) -> bool {
        let failed = match &task {
            Task::Primitive(primitive) => primitive
                .failing_condition(ctx)
                .map(|condition| condition.name().to_string()),
            Task::Compound(_) => None,
        };

        if let Some(condition) = failed {
            debug!(task = %task.name(), %condition, "condition failed, aborting plan");
            self.abort(ctx);
            self.emit(PlannerEvent::ConditionFailed {
                task: task.name().to_string(),
                condition,
            });
            return false;
        }

        self.emit(PlannerEvent::NewTask {
            task: task.name().to_string(),
        });
        self.current_task = Some(task);
        true
    }

    fn execute_current(&mut self, ctx: &mut C) -> Pass {
        let primitive = match self.current_task.clone() {
            None => return Pass::Yield,
            Some(Task::Primitive(primitive)) => primitive,
            Some(Task::Compound(compound)) => {
                self.unrunnable(compound.name(), ctx);
                return Pass::Yield;
            }
        };
        let Some(operator) = primitive.operator() else {
            self.unrunnable(primitive.name(), ctx);
            return Pass::Yield;
        };

        match operator.update(ctx) {
            TaskStatus::Success => {
                for effect in primitive.effects() {
                    if effect.effect_type().applies_on_success() {
                        effect.apply(ctx);
                        self.emit(PlannerEvent::EffectApplied {
                            task: primitive.name().to_string(),
                            effect: effect.name().to_string(),
                        });
                    }
                }
                self.current_task = None;
                self.emit(PlannerEvent::TaskSucceeded {
                    task: primitive.name().to_string(),
                });

                if !self.plan.is_empty() {
                    return Pass::Yield;
                }

                let planning = ctx.planning_mut();
                planning.mtr.clear();
                planning.last_mtr.clear();
                planning.dirty = false;
                debug!(task = %primitive.name(), "plan completed");
                self.emit(PlannerEvent::PlanCompleted);
                Pass::PlanCompleted
            }
            TaskStatus::Failure => {
                debug!(task = %primitive.name(), "task failed, aborting plan");
                self.abort(ctx);
                self.emit(PlannerEvent::TaskFailed {
                    task: primitive.name().to_string(),
                });
                Pass::Yield
            }
            TaskStatus::Continue => {
                self.emit(PlannerEvent::TaskContinues {
                    task: primitive.name().to_string(),
                });
                Pass::Yield
            }
        }
    }

    /// The active task has nothing to execute. Domains should never produce this.
    fn unrunnable(&mut self, name: &str, ctx: &mut C) {
        warn!(task = %name, policy = ?self.config.missing_operator, "task has no operator");
        self.emit(PlannerEvent::MissingOperator {
            task: name.to_string(),
        });
        match self.config.missing_operator {
            MissingOperatorPolicy::Skip => self.current_task = None,
            MissingOperatorPolicy::Abort => self.abort(ctx),
        }
    }

    /// Discard the plan. The next tick's replan gate picks up from here.
    fn abort(&mut self, ctx: &mut C) {
        self.current_task = None;
        self.plan.clear();

        let planning = ctx.planning_mut();
        planning.mtr.clear();
        planning.last_mtr.clear();
    }
}

/// Let a discarded primitive task's operator release whatever it was doing.
fn stop_task<C>(task: &Task<C>, ctx: &mut C) {
    if let Some(operator) = task.as_primitive().and_then(|primitive| primitive.operator()) {
        operator.stop(ctx);
    }
}
