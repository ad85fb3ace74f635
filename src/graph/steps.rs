use std::collections::BTreeSet;

use crate::error::TaskdeskError;
use crate::models::TaskGroupTask;

use super::cycle::StepGraph;

pub fn graph_of(staged: &[TaskGroupTask]) -> StepGraph {
    let mut graph = StepGraph::new();
    for task in staged {
        let Some(step) = task.step_number.as_deref() else {
            continue;
        };
        graph.add_node(step);
        for dep in &task.dependent_steps {
            graph.add_edge(step, dep);
        }
    }
    graph
}

/// Check a candidate task's dependencies against the tasks already staged.
///
/// Every dependent step must name a staged step, and the resulting graph must
/// stay acyclic. Tasks without a step number can still depend on others; they
/// just cannot be depended upon.
pub fn check_candidate(
    staged: &[TaskGroupTask],
    step: Option<&str>,
    dependent_steps: &BTreeSet<String>,
) -> Result<(), TaskdeskError> {
    let mut graph = graph_of(staged);
    for dep in dependent_steps {
        if !graph.contains(dep) {
            return Err(TaskdeskError::unknown_step(dep));
        }
    }
    if let Some(step) = step {
        for dep in dependent_steps {
            graph.add_edge(step, dep);
        }
        graph.check_acyclic()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use ulid::Ulid;

    fn staged(step: &str, deps: &[&str]) -> TaskGroupTask {
        TaskGroupTask {
            id: Ulid::new(),
            name: format!("step {step}"),
            step_number: Some(step.to_string()),
            assign_to_role: "Operator".into(),
            scheduling_type: "One-time".into(),
            repeat_pattern: None,
            duration: None,
            assign_to: None,
            dependent_steps: deps.iter().map(|d| d.to_string()).collect(),
            start_date_time: None,
        }
    }

    fn deps(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_depending_on_staged_step() {
        let tasks = vec![staged("1", &[]), staged("2", &["1"])];
        assert!(check_candidate(&tasks, Some("3"), &deps(&["1", "2"])).is_ok());
    }

    #[test]
    fn test_unknown_step_rejected() {
        let tasks = vec![staged("1", &[])];
        let err = check_candidate(&tasks, Some("2"), &deps(&["7"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownStep);
    }

    #[test]
    fn test_reusing_step_number_to_close_a_loop() {
        let tasks = vec![staged("1", &[]), staged("2", &["1"])];
        let err = check_candidate(&tasks, Some("1"), &deps(&["2"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::CycleDetected);
    }

    #[test]
    fn test_unnumbered_task_may_depend() {
        let tasks = vec![staged("1", &[])];
        assert!(check_candidate(&tasks, None, &deps(&["1"])).is_ok());
    }
}
