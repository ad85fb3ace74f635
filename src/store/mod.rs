pub mod group_store;
pub mod task_store;
pub mod workspace;

pub use group_store::{TaskGroupRepository, TaskGroupStore};
pub use task_store::{TaskRepository, TaskStore};
pub use workspace::{Snapshot, Workspace};
