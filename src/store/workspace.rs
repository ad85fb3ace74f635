use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::TaskdeskError;
use crate::models::{
    Task, TaskGroup, TaskGroupStatus, TaskGroupTask, TASK_GROUP_PREFIX, TASK_PREFIX,
};
use crate::notify::{Clock, NotificationRelay};

use super::{TaskGroupRepository, TaskGroupStore, TaskRepository, TaskStore};

pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// The single shared session state: both stores plus the notification relay.
///
/// Passed explicitly to whatever needs it; there is no global instance.
pub struct Workspace {
    tasks: TaskStore,
    groups: TaskGroupStore,
    relay: NotificationRelay,
    operator: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub task_groups: Vec<TaskGroup>,
    pub last_created_task: Option<Task>,
    pub last_created_task_group: Option<TaskGroup>,
    pub show_task_created_notification: bool,
    pub show_task_group_created_notification: bool,
}

impl Workspace {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: TaskStore::new(),
            groups: TaskGroupStore::new(),
            relay: NotificationRelay::new(clock, config.task_notice(), config.group_notice()),
            operator: config.operator.clone(),
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task_groups(&self) -> &[TaskGroup] {
        self.groups.task_groups()
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.find_task(id)
    }

    pub fn find_task_group(&self, id: &str) -> Option<&TaskGroup> {
        self.groups.find_task_group(id)
    }

    pub fn next_task_id(&self) -> Result<String, TaskdeskError> {
        self.tasks
            .next_task_id()
            .ok_or_else(|| TaskdeskError::ids_exhausted(TASK_PREFIX))
    }

    pub fn next_task_group_id(&self) -> Result<String, TaskdeskError> {
        self.groups
            .next_task_group_id()
            .ok_or_else(|| TaskdeskError::ids_exhausted(TASK_GROUP_PREFIX))
    }

    pub fn mint_task_group_id(&mut self) -> Result<String, TaskdeskError> {
        self.groups.mint_task_group_id()
    }

    /// Fails unless one group id and `task_count` task ids can still be minted.
    pub fn ensure_ids_for(&self, task_count: usize) -> Result<(), TaskdeskError> {
        if self.groups.task_group_ids_left() == 0 {
            return Err(TaskdeskError::ids_exhausted(TASK_GROUP_PREFIX));
        }
        self.ensure_task_ids(task_count)
    }

    fn ensure_task_ids(&self, task_count: usize) -> Result<(), TaskdeskError> {
        let left = usize::try_from(self.tasks.task_ids_left()).unwrap_or(usize::MAX);
        if task_count > left {
            return Err(TaskdeskError::ids_exhausted(TASK_PREFIX));
        }
        Ok(())
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.add_task(task.clone());
        self.relay.announce_task(task);
    }

    pub fn update_task(&mut self, task: Task) -> bool {
        self.tasks.update_task(task)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.tasks.delete_task(id)
    }

    pub fn add_task_group(&mut self, group: TaskGroup) {
        self.groups.add_task_group(group.clone());
        self.relay.announce_task_group(group);
    }

    pub fn update_task_group(&mut self, group: TaskGroup) -> bool {
        self.groups.update_task_group(group)
    }

    pub fn set_task_group_status(
        &mut self,
        id: &str,
        status: TaskGroupStatus,
    ) -> Result<bool, TaskdeskError> {
        self.groups.set_task_group_status(id, status)
    }

    /// Tasks already materialized from the group stay in the repository.
    pub fn delete_task_group(&mut self, id: &str) -> bool {
        self.groups.delete_task_group(id)
    }

    /// Materialize one repository task per embedded task of `group_id`.
    ///
    /// Unknown group: nothing is added and the result is empty. Bulk
    /// materialization does not raise the task notice. Either every task gets
    /// an id or none is added.
    pub fn add_tasks_from_task_group(
        &mut self,
        group_id: &str,
        group_tasks: &[TaskGroupTask],
    ) -> Result<Vec<Task>, TaskdeskError> {
        let Some(group) = self.groups.find_task_group(group_id) else {
            tracing::warn!(task_group_id = %group_id, "materialize: no such task group");
            return Ok(Vec::new());
        };
        self.ensure_task_ids(group_tasks.len())?;
        let task_type = if group.tg_type.is_empty() {
            group.type_of_tg.as_str().to_string()
        } else {
            group.tg_type.clone()
        };
        let (group_name, created_by, created_on, unit) = (
            group.name.clone(),
            group.created_by.clone(),
            group.created_on.clone(),
            group.unit.clone(),
        );

        let mut created = Vec::with_capacity(group_tasks.len());
        for gt in group_tasks {
            let description = match gt.step_number.as_deref() {
                Some(step) => format!("Step {step} of {group_name}"),
                None => format!("Part of {group_name}"),
            };
            let task = Task {
                id: self.tasks.mint_task_id()?,
                name: gt.name.clone(),
                created_by: created_by.clone(),
                created_on: created_on.clone(),
                task_type: task_type.clone(),
                skill: gt.assign_to_role.clone(),
                unit: unit.clone(),
                description: Some(description),
            };
            self.tasks.add_task(task.clone());
            created.push(task);
        }
        tracing::info!(task_group_id = %group_id, count = created.len(), "materialized tasks");
        Ok(created)
    }

    pub fn poll_notifications(&mut self) -> usize {
        self.relay.poll()
    }

    pub fn last_created_task(&self) -> Option<&Task> {
        self.relay.last_created_task()
    }

    pub fn last_created_task_group(&self) -> Option<&TaskGroup> {
        self.relay.last_created_task_group()
    }

    pub fn show_task_created_notification(&self) -> bool {
        self.relay.show_task_created()
    }

    pub fn show_task_group_created_notification(&self) -> bool {
        self.relay.show_task_group_created()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks().to_vec(),
            task_groups: self.task_groups().to_vec(),
            last_created_task: self.last_created_task().cloned(),
            last_created_task_group: self.last_created_task_group().cloned(),
            show_task_created_notification: self.show_task_created_notification(),
            show_task_group_created_notification: self.show_task_group_created_notification(),
        }
    }
}
