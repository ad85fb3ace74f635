use crate::error::TaskdeskError;
use crate::models::{IdSequence, Task};

/// Mutators over the flat task collection.
///
/// Lookups that miss are soft: `update_task` and `delete_task` report `false`
/// and leave the collection untouched.
pub trait TaskRepository {
    fn tasks(&self) -> &[Task];
    fn find_task(&self, id: &str) -> Option<&Task>;
    /// Id the next minted task would get, `None` once the id space is used up.
    fn next_task_id(&self) -> Option<String>;
    fn mint_task_id(&mut self) -> Result<String, TaskdeskError>;
    fn task_ids_left(&self) -> u32;
    fn add_task(&mut self, task: Task);
    fn update_task(&mut self, task: Task) -> bool;
    fn delete_task(&mut self, id: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdSequence,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            ids: IdSequence::tasks(),
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            store.add_task(task);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository for TaskStore {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn next_task_id(&self) -> Option<String> {
        self.ids.peek()
    }

    fn mint_task_id(&mut self) -> Result<String, TaskdeskError> {
        self.ids.mint()
    }

    fn task_ids_left(&self) -> u32 {
        self.ids.remaining()
    }

    fn add_task(&mut self, task: Task) {
        tracing::debug!(task_id = %task.id, name = %task.name, "add task");
        self.ids.observe(&task.id);
        self.tasks.push(task);
    }

    fn update_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                tracing::debug!(task_id = %task.id, "update task");
                *slot = task;
                true
            }
            None => {
                tracing::debug!(task_id = %task.id, "update task: no such id");
                false
            }
        }
    }

    fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        tracing::debug!(task_id = %id, removed, "delete task");
        removed
    }
}
