//! Shape checks for plans handed over by a decomposition engine.

use crate::domain::Plan;
use crate::task::Task;

/// Check that every queued task is something the executor can run:
/// - Only primitive tasks
/// - Every primitive task has an operator
///
/// Returns a list of stable error messages (empty on success).
pub fn validate_plan<C>(plan: &Plan<C>) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, task) in plan.iter().enumerate() {
        match task {
            Task::Compound(compound) => errors.push(format!(
                "plan[{}]: compound task '{}' cannot be executed",
                index,
                compound.name()
            )),
            Task::Primitive(primitive) if primitive.operator().is_none() => errors.push(format!(
                "plan[{}]: primitive task '{}' has no operator",
                index,
                primitive.name()
            )),
            Task::Primitive(_) => {}
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TaskStatus;
    use crate::task::{CompoundTask, FuncOperator, PrimitiveTask};

    #[test]
    fn accepts_primitive_tasks_with_operators() {
        let plan: Plan<()> = Plan::from(vec![Task::from(
            PrimitiveTask::new("walk")
                .with_operator(FuncOperator::new(|_: &mut ()| TaskStatus::Success)),
        )]);

        assert!(validate_plan(&plan).is_empty());
    }

    #[test]
    fn reports_compound_and_operatorless_tasks_by_position() {
        let plan: Plan<()> = Plan::from(vec![
            Task::from(PrimitiveTask::new("idle")),
            Task::from(CompoundTask::new("BeTrunkThumper")),
        ]);

        assert_eq!(
            validate_plan(&plan),
            vec![
                "plan[0]: primitive task 'idle' has no operator".to_string(),
                "plan[1]: compound task 'BeTrunkThumper' cannot be executed".to_string(),
            ]
        );
    }
}
