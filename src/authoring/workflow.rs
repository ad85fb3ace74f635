use std::collections::BTreeSet;

use serde::Serialize;
use ulid::Ulid;

use crate::error::TaskdeskError;
use crate::graph::steps;
use crate::models::{
    RepeatPattern, Task, TaskGroup, TaskGroupStatus, TaskGroupTask, TaskGroupType,
};
use crate::store::workspace::{today, Workspace};

use super::draft::{
    non_empty, parse_step, FieldErrors, GroupDraft, GroupField, TaskDraft, TaskField,
};

/// Where the form is. A successful submit passes through "submitted" and
/// lands straight back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    DraftGroupFields,
    DraftWithTasks,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraftGroupFields => "draft_group_fields",
            Self::DraftWithTasks => "draft_with_tasks",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub task_group: TaskGroup,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone)]
pub struct AuthoringWorkflow {
    phase: Phase,
    group: GroupDraft,
    task: TaskDraft,
    staged: Vec<TaskGroupTask>,
    errors: FieldErrors,
}

impl Default for AuthoringWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthoringWorkflow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            group: GroupDraft::default(),
            task: TaskDraft::default(),
            staged: Vec::new(),
            errors: FieldErrors::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn group_draft(&self) -> &GroupDraft {
        &self.group
    }

    pub fn task_draft(&self) -> &TaskDraft {
        &self.task
    }

    pub fn staged_tasks(&self) -> &[TaskGroupTask] {
        &self.staged
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn open(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::DraftGroupFields;
        }
    }

    pub fn set_group_field(&mut self, field: GroupField, value: impl Into<String>) {
        self.open();
        self.group.set(field, value.into());
        self.errors.group.remove(&field);
    }

    pub fn set_task_field(&mut self, field: TaskField, value: impl Into<String>) {
        self.open();
        self.task.set(field, value.into());
        self.errors.task.remove(&field);
    }

    /// Select or deselect a dependent step. Returns whether it is now selected.
    pub fn toggle_dependent_step(&mut self, step: &str) -> bool {
        self.open();
        self.errors.task.remove(&TaskField::DependentSteps);
        let step = step.trim().to_string();
        if self.task.dependent_steps.remove(&step) {
            false
        } else {
            self.task.dependent_steps.insert(step);
            true
        }
    }

    /// Step numbers the current task may depend on: every staged step but its own.
    pub fn available_dependent_steps(&self) -> Vec<&str> {
        let own = parse_step(&self.task.step_number);
        let mut seen = BTreeSet::new();
        self.staged
            .iter()
            .filter_map(|t| t.step_number.as_deref())
            .filter(|s| own.as_deref() != Some(*s))
            .filter(|s| seen.insert(*s))
            .collect()
    }

    fn group_type(&self) -> Option<TaskGroupType> {
        TaskGroupType::from_str(self.group.type_of_tg.trim())
    }

    /// Validate the task sub-form and stage it. On failure nothing is staged
    /// and the sub-form keeps what was typed.
    pub fn add_task(&mut self) -> Result<&TaskGroupTask, TaskdeskError> {
        self.open();
        self.errors.task.clear();

        let name = non_empty(&self.task.name);
        let role = non_empty(&self.task.assign_to_role);
        let step = match non_empty(&self.task.step_number) {
            None => Ok(None),
            Some(raw) => parse_step(&raw).map(Some).ok_or(()),
        };
        let repeat = match non_empty(&self.task.repeat_pattern) {
            None => Ok(None),
            Some(raw) => RepeatPattern::from_str(&raw).map(Some).ok_or(()),
        };
        let deps: Option<BTreeSet<String>> = self
            .task
            .dependent_steps
            .iter()
            .map(|d| parse_step(d))
            .collect();

        let (name, role, step, repeat, deps) = match (name, role, step, repeat, deps) {
            (Some(name), Some(role), Ok(step), Ok(repeat), Some(deps)) => {
                (name, role, step, repeat, deps)
            }
            (name, role, step, repeat, deps) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push(TaskField::Name);
                }
                if role.is_none() {
                    missing.push(TaskField::AssignToRole);
                }
                if step.is_err() {
                    missing.push(TaskField::StepNumber);
                }
                if repeat.is_err() {
                    missing.push(TaskField::RepeatPattern);
                }
                if deps.is_none() {
                    missing.push(TaskField::DependentSteps);
                }
                let names: Vec<_> = missing.iter().map(TaskField::as_str).collect();
                tracing::debug!(fields = ?names, "task rejected");
                let err = TaskdeskError::validation(format!(
                    "Task has invalid or missing fields: {}",
                    names.join(", ")
                ));
                self.errors.task.extend(missing);
                return Err(err);
            }
        };

        if let Err(e) = steps::check_candidate(&self.staged, step.as_deref(), &deps) {
            self.errors.task.insert(TaskField::DependentSteps);
            tracing::debug!(error = %e, "task rejected");
            return Err(e);
        }

        let group_type = self.group_type();
        let scheduling_type = non_empty(&self.task.scheduling_type)
            .or_else(|| group_type.map(|t| t.as_str().to_string()))
            .unwrap_or_default();
        let repeat_pattern = match group_type {
            Some(TaskGroupType::OneTime) => None,
            _ => repeat,
        };

        let staged = TaskGroupTask {
            id: Ulid::new(),
            name,
            step_number: step,
            assign_to_role: role,
            scheduling_type,
            repeat_pattern,
            duration: non_empty(&self.task.duration),
            assign_to: non_empty(&self.task.assign_to),
            dependent_steps: deps,
            start_date_time: non_empty(&self.task.start_date_time),
        };
        tracing::debug!(id = %staged.id, name = %staged.name, "task staged");

        self.staged.push(staged);
        self.task = TaskDraft::default();
        self.phase = Phase::DraftWithTasks;
        Ok(&self.staged[self.staged.len() - 1])
    }

    /// Unstage a task. Steps that other staged tasks depend on cannot go.
    pub fn remove_task(&mut self, id: Ulid) -> Result<bool, TaskdeskError> {
        let Some(pos) = self.staged.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(step) = self.staged[pos].step_number.as_deref() {
            let still_numbered = self
                .staged
                .iter()
                .enumerate()
                .any(|(i, t)| i != pos && t.step_number.as_deref() == Some(step));
            let depended_on = self
                .staged
                .iter()
                .any(|t| t.dependent_steps.contains(step));
            if depended_on && !still_numbered {
                return Err(TaskdeskError::validation(format!(
                    "Step {step} is a dependency of another staged task"
                )));
            }
        }
        self.staged.remove(pos);
        if self.staged.is_empty() && self.phase == Phase::DraftWithTasks {
            self.phase = Phase::DraftGroupFields;
        }
        Ok(true)
    }

    /// Create the group: store it, materialize its tasks and reset the form.
    /// A rejected submit leaves the stores and the staged tasks untouched and
    /// the form open.
    pub fn submit(&mut self, ws: &mut Workspace) -> Result<Submission, TaskdeskError> {
        self.open();
        self.errors.group.clear();

        let required = [
            GroupField::Name,
            GroupField::TypeOfTg,
            GroupField::Unit,
            GroupField::Department,
        ];
        let mut missing = Vec::new();
        for field in required {
            if self.group.get(field).trim().is_empty() {
                missing.push(field);
            }
        }
        let type_of_tg = self.group_type();
        if type_of_tg.is_none() && !missing.contains(&GroupField::TypeOfTg) {
            missing.push(GroupField::TypeOfTg);
        }
        let Some(type_of_tg) = type_of_tg.filter(|_| missing.is_empty()) else {
            let names: Vec<_> = missing.iter().map(GroupField::as_str).collect();
            self.errors.group.extend(missing);
            tracing::debug!(fields = ?names, "task group rejected");
            return Err(TaskdeskError::validation(format!(
                "Task group has invalid or missing fields: {}",
                names.join(", ")
            )));
        };

        ws.ensure_ids_for(self.staged.len())?;
        let id = ws.mint_task_group_id()?;
        let mut tasks = std::mem::take(&mut self.staged);
        if type_of_tg == TaskGroupType::OneTime {
            for t in &mut tasks {
                t.repeat_pattern = None;
            }
        }

        let group = TaskGroup {
            id,
            name: self.group.name.trim().to_string(),
            created_by: ws.operator().to_string(),
            created_on: today(),
            type_of_tg,
            tg_type: self.group.tg_type.trim().to_string(),
            number_of_tasks: tasks.len().to_string(),
            unit: self.group.unit.trim().to_string(),
            department: self.group.department.trim().to_string(),
            status: TaskGroupStatus::Planned,
            description: non_empty(&self.group.description),
            start_date_time: non_empty(&self.group.start_date_time),
            tasks,
        };
        tracing::info!(
            task_group_id = %group.id,
            tasks = group.tasks.len(),
            "task group submitted"
        );

        ws.add_task_group(group.clone());
        let tasks = ws.add_tasks_from_task_group(&group.id, &group.tasks)?;
        self.reset();
        Ok(Submission {
            task_group: group,
            tasks,
        })
    }

    /// Throw the draft away.
    pub fn cancel(&mut self) {
        tracing::debug!(phase = self.phase.as_str(), staged = self.staged.len(), "draft cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorCode;
    use crate::notify::ManualClock;
    use std::sync::Arc;

    fn workspace() -> Workspace {
        Workspace::new(&Config::default(), Arc::new(ManualClock::new()))
    }

    fn fill_group(wf: &mut AuthoringWorkflow) {
        wf.set_group_field(GroupField::Name, "Audit");
        wf.set_group_field(GroupField::TypeOfTg, "One-time");
        wf.set_group_field(GroupField::Unit, "Unit 1");
        wf.set_group_field(GroupField::Department, "Production");
    }

    fn stage(wf: &mut AuthoringWorkflow, name: &str, role: &str, step: &str) {
        wf.set_task_field(TaskField::Name, name);
        wf.set_task_field(TaskField::AssignToRole, role);
        wf.set_task_field(TaskField::StepNumber, step);
        wf.add_task().unwrap();
    }

    #[test]
    fn test_phases() {
        let mut wf = AuthoringWorkflow::new();
        assert_eq!(wf.phase(), Phase::Idle);
        wf.set_group_field(GroupField::Name, "Audit");
        assert_eq!(wf.phase(), Phase::DraftGroupFields);
        stage(&mut wf, "Inspect", "Auditor", "1");
        assert_eq!(wf.phase(), Phase::DraftWithTasks);
        wf.cancel();
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.staged_tasks().is_empty());
        assert_eq!(wf.group_draft(), &GroupDraft::default());
    }

    #[test]
    fn test_step_zero_and_negative_rejected() {
        let mut wf = AuthoringWorkflow::new();
        for bad in ["0", "-1"] {
            wf.set_task_field(TaskField::Name, "Inspect");
            wf.set_task_field(TaskField::AssignToRole, "Auditor");
            wf.set_task_field(TaskField::StepNumber, bad);
            let err = wf.add_task().unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
            assert!(wf.errors().has_task(TaskField::StepNumber));
            assert!(wf.staged_tasks().is_empty());
            assert_eq!(wf.task_draft().name, "Inspect");
        }
        wf.set_task_field(TaskField::StepNumber, "3");
        assert!(!wf.errors().has_task(TaskField::StepNumber));
        wf.add_task().unwrap();
        assert_eq!(wf.staged_tasks().len(), 1);
        assert_eq!(wf.staged_tasks()[0].step_number.as_deref(), Some("3"));
    }

    #[test]
    fn test_required_task_fields() {
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        assert!(wf.add_task().is_err());
        assert!(wf.errors().has_task(TaskField::Name));
        assert!(wf.errors().has_task(TaskField::AssignToRole));
        assert!(!wf.errors().has_task(TaskField::StepNumber));
        assert_eq!(wf.phase(), Phase::DraftGroupFields);
    }

    #[test]
    fn test_unknown_dependent_step_rejected() {
        let mut wf = AuthoringWorkflow::new();
        stage(&mut wf, "Inspect", "Auditor", "1");
        wf.set_task_field(TaskField::Name, "Report");
        wf.set_task_field(TaskField::AssignToRole, "Supervisor");
        wf.toggle_dependent_step("4");
        let err = wf.add_task().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownStep);
        assert!(wf.errors().has_task(TaskField::DependentSteps));
        assert_eq!(wf.staged_tasks().len(), 1);

        assert!(!wf.toggle_dependent_step("4"));
        assert!(wf.toggle_dependent_step("1"));
        wf.add_task().unwrap();
        assert_eq!(wf.staged_tasks().len(), 2);
    }

    #[test]
    fn test_available_steps_exclude_own() {
        let mut wf = AuthoringWorkflow::new();
        stage(&mut wf, "a", "Operator", "1");
        stage(&mut wf, "b", "Operator", "2");
        wf.set_task_field(TaskField::StepNumber, "2");
        assert_eq!(wf.available_dependent_steps(), vec!["1"]);
    }

    #[test]
    fn test_scheduling_follows_group_type() {
        let mut wf = AuthoringWorkflow::new();
        wf.set_group_field(GroupField::TypeOfTg, "One-time");
        wf.set_task_field(TaskField::Name, "Inspect");
        wf.set_task_field(TaskField::AssignToRole, "Auditor");
        wf.set_task_field(TaskField::RepeatPattern, "weekly");
        let staged = wf.add_task().unwrap();
        assert_eq!(staged.scheduling_type, "One-time");
        assert_eq!(staged.repeat_pattern, None);

        wf.set_group_field(GroupField::TypeOfTg, "Repetitive");
        wf.set_task_field(TaskField::Name, "Clean");
        wf.set_task_field(TaskField::AssignToRole, "Operator");
        wf.set_task_field(TaskField::RepeatPattern, "weekly");
        let staged = wf.add_task().unwrap();
        assert_eq!(staged.repeat_pattern, Some(RepeatPattern::Weekly));
    }

    #[test]
    fn test_bad_repeat_pattern() {
        let mut wf = AuthoringWorkflow::new();
        wf.set_task_field(TaskField::Name, "Clean");
        wf.set_task_field(TaskField::AssignToRole, "Operator");
        wf.set_task_field(TaskField::RepeatPattern, "hourly");
        assert!(wf.add_task().is_err());
        assert!(wf.errors().has_task(TaskField::RepeatPattern));
    }

    #[test]
    fn test_submit_audit_scenario() {
        let mut ws = workspace();
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        stage(&mut wf, "Inspect", "Auditor", "1");

        let before = ws.task_groups().len();
        let out = wf.submit(&mut ws).unwrap();

        assert_eq!(out.task_group.id, format!("TG-{:03}", before + 1));
        assert_eq!(out.task_group.status, TaskGroupStatus::Planned);
        assert_eq!(out.task_group.number_of_tasks, "1");
        assert_eq!(out.task_group.created_by, "Admin");
        assert_eq!(ws.task_groups().len(), before + 1);
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.tasks()[0].skill, "Auditor");
        assert_eq!(ws.tasks()[0].name, "Inspect");
        assert!(ws.show_task_group_created_notification());
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[test]
    fn test_three_tasks_materialize_three() {
        let mut ws = workspace();
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        stage(&mut wf, "a", "Operator", "1");
        stage(&mut wf, "b", "Operator", "2");
        stage(&mut wf, "c", "Operator", "");
        let out = wf.submit(&mut ws).unwrap();

        assert_eq!(out.tasks.len(), 3);
        let ids: BTreeSet<_> = ws.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_submit_without_department_rejected() {
        let mut ws = workspace();
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        wf.set_group_field(GroupField::Department, "");
        stage(&mut wf, "Inspect", "Auditor", "1");

        let err = wf.submit(&mut ws).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(wf.errors().has_group(GroupField::Department));
        assert!(!wf.errors().has_group(GroupField::Name));
        assert!(ws.task_groups().is_empty());
        assert!(ws.tasks().is_empty());
        assert_eq!(wf.phase(), Phase::DraftWithTasks);
        assert_eq!(wf.staged_tasks().len(), 1);
    }

    #[test]
    fn test_submit_unknown_group_type_rejected() {
        let mut ws = workspace();
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        wf.set_group_field(GroupField::TypeOfTg, "Sometimes");
        assert!(wf.submit(&mut ws).is_err());
        assert!(wf.errors().has_group(GroupField::TypeOfTg));
    }

    #[test]
    fn test_failed_submit_from_idle_opens_form() {
        let mut ws = workspace();
        let mut wf = AuthoringWorkflow::new();
        assert!(wf.submit(&mut ws).is_err());
        assert_eq!(wf.phase(), Phase::DraftGroupFields);
        assert!(wf.errors().has_group(GroupField::Name));
        assert!(wf.errors().has_group(GroupField::Department));
    }

    #[test]
    fn test_submit_without_task_ids_left_keeps_draft() {
        let mut ws = workspace();
        ws.add_task(Task {
            id: "T-4294967295".into(),
            name: "last".into(),
            created_by: "Admin".into(),
            created_on: "2024-05-01".into(),
            task_type: "Scheduled".into(),
            skill: "Operator".into(),
            unit: "Unit 1".into(),
            description: None,
        });
        let mut wf = AuthoringWorkflow::new();
        fill_group(&mut wf);
        stage(&mut wf, "Inspect", "Auditor", "1");

        assert!(wf.submit(&mut ws).is_err());
        assert!(ws.task_groups().is_empty());
        assert_eq!(wf.staged_tasks().len(), 1);
        assert_eq!(wf.phase(), Phase::DraftWithTasks);
    }

    #[test]
    fn test_remove_task() {
        let mut wf = AuthoringWorkflow::new();
        stage(&mut wf, "a", "Operator", "1");
        wf.set_task_field(TaskField::Name, "b");
        wf.set_task_field(TaskField::AssignToRole, "Operator");
        wf.toggle_dependent_step("1");
        wf.add_task().unwrap();

        let first = wf.staged_tasks()[0].id;
        let second = wf.staged_tasks()[1].id;
        assert!(wf.remove_task(first).is_err());
        assert!(wf.remove_task(second).unwrap());
        assert!(wf.remove_task(first).unwrap());
        assert!(!wf.remove_task(first).unwrap());
        assert_eq!(wf.phase(), Phase::DraftGroupFields);
    }
}
