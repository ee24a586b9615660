//! Planner behaviour driven by a configuration file on disk.

use std::fs;

use planner::config::{MissingOperatorPolicy, load_config};
use planner::core::types::TaskStatus;
use planner::executor::{Planner, PlannerEvent};
use planner::task::{PrimitiveTask, Task};
use planner::test_support::{ScriptedDomain, ScriptedOperator, TestWorld, task_with};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn abort_policy_from_config_discards_plan_on_operatorless_task() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("planner.toml");
    fs::write(
        &path,
        "missing_operator = \"abort\"\nmax_chained_plans = 4\nvalidate_plans = false\n",
    )
    .expect("write config");
    let cfg = load_config(&path).expect("load config");
    assert_eq!(cfg.missing_operator, MissingOperatorPolicy::Abort);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let next = ScriptedOperator::new(vec![TaskStatus::Continue]);
    let domain = ScriptedDomain::new(vec![Some(vec![
        Task::from(PrimitiveTask::new("daydream")),
        task_with("work", &next, Vec::new()),
    ])]);
    let mut world = TestWorld::default();
    let mut planner = Planner::with_config(cfg)
        .with_listener(move |event: &PlannerEvent| sink.borrow_mut().push(event.clone()));

    planner.tick(&domain, &mut world);

    assert!(planner.is_idle());
    assert_eq!(next.updates(), 0);
    assert!(events.borrow().contains(&PlannerEvent::MissingOperator {
        task: "daydream".to_string()
    }));
}
