use crate::error::TaskdeskError;
use crate::models::{IdSequence, TaskGroup, TaskGroupStatus};

pub trait TaskGroupRepository {
    fn task_groups(&self) -> &[TaskGroup];
    fn find_task_group(&self, id: &str) -> Option<&TaskGroup>;
    fn next_task_group_id(&self) -> Option<String>;
    fn mint_task_group_id(&mut self) -> Result<String, TaskdeskError>;
    fn task_group_ids_left(&self) -> u32;
    fn add_task_group(&mut self, group: TaskGroup);
    fn update_task_group(&mut self, group: TaskGroup) -> bool;
    /// `Ok(false)` when the id is unknown; errors only on a backwards move.
    fn set_task_group_status(
        &mut self,
        id: &str,
        status: TaskGroupStatus,
    ) -> Result<bool, TaskdeskError>;
    fn delete_task_group(&mut self, id: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct TaskGroupStore {
    groups: Vec<TaskGroup>,
    ids: IdSequence,
}

impl TaskGroupStore {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            ids: IdSequence::task_groups(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for TaskGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGroupRepository for TaskGroupStore {
    fn task_groups(&self) -> &[TaskGroup] {
        &self.groups
    }

    fn find_task_group(&self, id: &str) -> Option<&TaskGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn next_task_group_id(&self) -> Option<String> {
        self.ids.peek()
    }

    fn mint_task_group_id(&mut self) -> Result<String, TaskdeskError> {
        self.ids.mint()
    }

    fn task_group_ids_left(&self) -> u32 {
        self.ids.remaining()
    }

    fn add_task_group(&mut self, group: TaskGroup) {
        tracing::debug!(task_group_id = %group.id, tasks = group.tasks.len(), "add task group");
        self.ids.observe(&group.id);
        self.groups.push(group);
    }

    fn update_task_group(&mut self, group: TaskGroup) -> bool {
        match self.groups.iter_mut().find(|g| g.id == group.id) {
            Some(slot) => {
                tracing::debug!(task_group_id = %group.id, "update task group");
                *slot = group;
                true
            }
            None => {
                tracing::debug!(task_group_id = %group.id, "update task group: no such id");
                false
            }
        }
    }

    fn set_task_group_status(
        &mut self,
        id: &str,
        status: TaskGroupStatus,
    ) -> Result<bool, TaskdeskError> {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == id) else {
            tracing::debug!(task_group_id = %id, "set status: no such id");
            return Ok(false);
        };
        if !group.status.can_become(status) {
            return Err(TaskdeskError::invalid_transition(
                group.status.as_str(),
                status.as_str(),
            ));
        }
        tracing::info!(
            task_group_id = %id,
            from = group.status.as_str(),
            to = status.as_str(),
            "task group status"
        );
        group.status = status;
        Ok(true)
    }

    fn delete_task_group(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        let removed = self.groups.len() != before;
        tracing::debug!(task_group_id = %id, removed, "delete task group");
        removed
    }
}
