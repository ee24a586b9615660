//! Task shapes and the collaborator traits primitive tasks are built from.
//!
//! Compound tasks are opaque to the executor and only matter to the
//! decomposition engine. Primitive tasks carry guard conditions, tagged
//! effects, and an optional operator that the executor drives tick by tick.

use std::fmt;
use std::rc::Rc;

use crate::core::types::{EffectType, TaskStatus};

/// Guard evaluated against the world state before a primitive task starts.
pub trait Condition<C> {
    fn name(&self) -> &str;

    /// Must not mutate anything observable.
    fn is_valid(&self, ctx: &C) -> bool;
}

/// World-state change attached to a primitive task.
pub trait Effect<C> {
    fn name(&self) -> &str;

    fn effect_type(&self) -> EffectType;

    fn apply(&self, ctx: &mut C);
}

/// Executable behaviour of a primitive task.
///
/// `update` must not block: long-running work returns [`TaskStatus::Continue`]
/// and resumes on the next tick.
pub trait Operator<C> {
    fn update(&self, ctx: &mut C) -> TaskStatus;

    /// Called when the task is discarded mid-flight because a new plan replaced it.
    fn stop(&self, _ctx: &mut C) {}
}

/// Condition backed by a closure.
pub struct FuncCondition<C> {
    name: String,
    func: Box<dyn Fn(&C) -> bool>,
}

impl<C> FuncCondition<C> {
    pub fn new(name: impl Into<String>, func: impl Fn(&C) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl<C> Condition<C> for FuncCondition<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, ctx: &C) -> bool {
        (self.func)(ctx)
    }
}

/// Effect backed by a closure.
pub struct ActionEffect<C> {
    name: String,
    effect_type: EffectType,
    action: Box<dyn Fn(&mut C)>,
}

impl<C> ActionEffect<C> {
    pub fn new(
        name: impl Into<String>,
        effect_type: EffectType,
        action: impl Fn(&mut C) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            effect_type,
            action: Box::new(action),
        }
    }
}

impl<C> Effect<C> for ActionEffect<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn effect_type(&self) -> EffectType {
        self.effect_type
    }

    fn apply(&self, ctx: &mut C) {
        (self.action)(ctx);
    }
}

/// Operator backed by an update closure and an optional stop closure.
pub struct FuncOperator<C> {
    update: Box<dyn Fn(&mut C) -> TaskStatus>,
    stop: Option<Box<dyn Fn(&mut C)>>,
}

impl<C> FuncOperator<C> {
    pub fn new(update: impl Fn(&mut C) -> TaskStatus + 'static) -> Self {
        Self {
            update: Box::new(update),
            stop: None,
        }
    }

    pub fn with_stop(mut self, stop: impl Fn(&mut C) + 'static) -> Self {
        self.stop = Some(Box::new(stop));
        self
    }
}

impl<C> Operator<C> for FuncOperator<C> {
    fn update(&self, ctx: &mut C) -> TaskStatus {
        (self.update)(ctx)
    }

    fn stop(&self, ctx: &mut C) {
        if let Some(stop) = &self.stop {
            stop(ctx);
        }
    }
}

/// Leaf task executed directly by the planner.
pub struct PrimitiveTask<C> {
    name: String,
    conditions: Vec<Box<dyn Condition<C>>>,
    effects: Vec<Box<dyn Effect<C>>>,
    operator: Option<Box<dyn Operator<C>>>,
}

impl<C> PrimitiveTask<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            effects: Vec::new(),
            operator: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Condition<C> + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn with_effect(mut self, effect: impl Effect<C> + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    pub fn with_operator(mut self, operator: impl Operator<C> + 'static) -> Self {
        self.operator = Some(Box::new(operator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Box<dyn Condition<C>>] {
        &self.conditions
    }

    pub fn effects(&self) -> &[Box<dyn Effect<C>>] {
        &self.effects
    }

    pub fn operator(&self) -> Option<&dyn Operator<C>> {
        self.operator.as_deref()
    }

    /// First condition (in declaration order) that does not hold, if any.
    pub fn failing_condition(&self, ctx: &C) -> Option<&dyn Condition<C>> {
        self.conditions
            .iter()
            .map(|condition| &**condition)
            .find(|condition| !condition.is_valid(ctx))
    }
}

/// Task that decomposes into subtasks. Only the decomposition engine looks inside.
pub struct CompoundTask<C> {
    name: String,
    subtasks: Vec<Task<C>>,
}

impl<C> CompoundTask<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_subtask(mut self, task: impl Into<Task<C>>) -> Self {
        self.subtasks.push(task.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subtasks(&self) -> &[Task<C>] {
        &self.subtasks
    }
}

/// Shared handle to either task shape. Cloning is cheap.
pub enum Task<C> {
    Compound(Rc<CompoundTask<C>>),
    Primitive(Rc<PrimitiveTask<C>>),
}

impl<C> Task<C> {
    pub fn name(&self) -> &str {
        match self {
            Task::Compound(task) => task.name(),
            Task::Primitive(task) => task.name(),
        }
    }

    pub fn as_primitive(&self) -> Option<&Rc<PrimitiveTask<C>>> {
        match self {
            Task::Primitive(task) => Some(task),
            Task::Compound(_) => None,
        }
    }

    /// True if both handles point at the same task instance.
    pub fn ptr_eq(&self, other: &Task<C>) -> bool {
        match (self, other) {
            (Task::Compound(a), Task::Compound(b)) => Rc::ptr_eq(a, b),
            (Task::Primitive(a), Task::Primitive(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<C> Clone for Task<C> {
    fn clone(&self) -> Self {
        match self {
            Task::Compound(task) => Task::Compound(Rc::clone(task)),
            Task::Primitive(task) => Task::Primitive(Rc::clone(task)),
        }
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Compound(task) => f.debug_tuple("Compound").field(&task.name()).finish(),
            Task::Primitive(task) => f.debug_tuple("Primitive").field(&task.name()).finish(),
        }
    }
}

impl<C> From<PrimitiveTask<C>> for Task<C> {
    fn from(task: PrimitiveTask<C>) -> Self {
        Task::Primitive(Rc::new(task))
    }
}

impl<C> From<CompoundTask<C>> for Task<C> {
    fn from(task: CompoundTask<C>) -> Self {
        Task::Compound(Rc::new(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: i32,
    }

    #[test]
    fn failing_condition_reports_first_false_in_declaration_order() {
        let task = PrimitiveTask::<Counter>::new("guarded")
            .with_condition(FuncCondition::new("always", |_: &Counter| true))
            .with_condition(FuncCondition::new("positive", |ctx: &Counter| ctx.value > 0))
            .with_condition(FuncCondition::new("never", |_: &Counter| false));

        let ctx = Counter::default();
        let failed = task.failing_condition(&ctx).expect("a condition fails");
        assert_eq!(failed.name(), "positive");

        let ctx = Counter { value: 1 };
        let failed = task.failing_condition(&ctx).expect("a condition fails");
        assert_eq!(failed.name(), "never");
    }

    #[test]
    fn func_operator_stop_is_optional() {
        let plain = FuncOperator::new(|ctx: &mut Counter| {
            ctx.value += 1;
            TaskStatus::Continue
        });
        let mut ctx = Counter::default();
        assert_eq!(plain.update(&mut ctx), TaskStatus::Continue);
        plain.stop(&mut ctx);
        assert_eq!(ctx.value, 1);

        let stoppable = FuncOperator::new(|_: &mut Counter| TaskStatus::Success)
            .with_stop(|ctx: &mut Counter| ctx.value = -1);
        stoppable.stop(&mut ctx);
        assert_eq!(ctx.value, -1);
    }

    #[test]
    fn task_handles_compare_by_identity() {
        let a: Task<Counter> = PrimitiveTask::new("same").into();
        let b: Task<Counter> = PrimitiveTask::new("same").into();
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.name(), "same");
    }
}
