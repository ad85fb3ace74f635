//! Building a task group one form field at a time.

pub mod draft;
pub mod workflow;

pub use draft::{FieldErrors, GroupDraft, GroupField, TaskDraft, TaskField};
pub use workflow::{AuthoringWorkflow, Phase, Submission};
