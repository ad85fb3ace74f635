use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupField {
    Name,
    #[serde(rename = "typeOfTG")]
    TypeOfTg,
    TgType,
    Unit,
    Department,
    Description,
    StartDateTime,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TypeOfTg => "typeOfTG",
            Self::TgType => "tgType",
            Self::Unit => "unit",
            Self::Department => "department",
            Self::Description => "description",
            Self::StartDateTime => "startDateTime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Name,
    StepNumber,
    AssignToRole,
    SchedulingType,
    RepeatPattern,
    Duration,
    AssignTo,
    StartDateTime,
    DependentSteps,
}

impl TaskField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StepNumber => "stepNumber",
            Self::AssignToRole => "assignToRole",
            Self::SchedulingType => "schedulingType",
            Self::RepeatPattern => "repeatPattern",
            Self::Duration => "duration",
            Self::AssignTo => "assignTo",
            Self::StartDateTime => "startDateTime",
            Self::DependentSteps => "dependentSteps",
        }
    }
}

/// Group-level form state. Everything is raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDraft {
    pub name: String,
    #[serde(rename = "typeOfTG")]
    pub type_of_tg: String,
    pub tg_type: String,
    pub unit: String,
    pub department: String,
    pub description: String,
    pub start_date_time: String,
}

impl GroupDraft {
    pub fn get(&self, field: GroupField) -> &str {
        match field {
            GroupField::Name => &self.name,
            GroupField::TypeOfTg => &self.type_of_tg,
            GroupField::TgType => &self.tg_type,
            GroupField::Unit => &self.unit,
            GroupField::Department => &self.department,
            GroupField::Description => &self.description,
            GroupField::StartDateTime => &self.start_date_time,
        }
    }

    pub fn set(&mut self, field: GroupField, value: String) {
        let slot = match field {
            GroupField::Name => &mut self.name,
            GroupField::TypeOfTg => &mut self.type_of_tg,
            GroupField::TgType => &mut self.tg_type,
            GroupField::Unit => &mut self.unit,
            GroupField::Department => &mut self.department,
            GroupField::Description => &mut self.description,
            GroupField::StartDateTime => &mut self.start_date_time,
        };
        *slot = value;
    }
}

/// The task currently being typed into the "add task" sub-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub name: String,
    pub step_number: String,
    pub assign_to_role: String,
    pub scheduling_type: String,
    pub repeat_pattern: String,
    pub duration: String,
    pub assign_to: String,
    pub start_date_time: String,
    pub dependent_steps: BTreeSet<String>,
}

impl TaskDraft {
    /// Scalar fields only; dependent steps take a comma separated list.
    pub fn set(&mut self, field: TaskField, value: String) {
        let slot = match field {
            TaskField::Name => &mut self.name,
            TaskField::StepNumber => &mut self.step_number,
            TaskField::AssignToRole => &mut self.assign_to_role,
            TaskField::SchedulingType => &mut self.scheduling_type,
            TaskField::RepeatPattern => &mut self.repeat_pattern,
            TaskField::Duration => &mut self.duration,
            TaskField::AssignTo => &mut self.assign_to,
            TaskField::StartDateTime => &mut self.start_date_time,
            TaskField::DependentSteps => {
                self.dependent_steps = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                return;
            }
        };
        *slot = value;
    }
}

/// Per-field error flags for the form to highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub group: BTreeSet<GroupField>,
    pub task: BTreeSet<TaskField>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.task.is_empty()
    }

    pub fn has_group(&self, field: GroupField) -> bool {
        self.group.contains(&field)
    }

    pub fn has_task(&self, field: TaskField) -> bool {
        self.task.contains(&field)
    }

    pub fn clear(&mut self) {
        self.group.clear();
        self.task.clear();
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A positive integer, normalized (`"03"` becomes `"3"`).
pub(crate) fn parse_step(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step() {
        assert_eq!(parse_step("3").as_deref(), Some("3"));
        assert_eq!(parse_step(" 07 ").as_deref(), Some("7"));
        assert_eq!(parse_step("0"), None);
        assert_eq!(parse_step("-1"), None);
        assert_eq!(parse_step("+2"), None);
        assert_eq!(parse_step("1.5"), None);
        assert_eq!(parse_step("two"), None);
        assert_eq!(parse_step(""), None);
    }

    #[test]
    fn test_dependent_steps_from_list() {
        let mut draft = TaskDraft::default();
        draft.set(TaskField::DependentSteps, "2, 1,,3".into());
        let steps: Vec<_> = draft.dependent_steps.iter().map(String::as_str).collect();
        assert_eq!(steps, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_group_field_names_match_form_keys() {
        let field: GroupField = serde_json::from_str("\"typeOfTG\"").unwrap();
        assert_eq!(field, GroupField::TypeOfTg);
        let field: TaskField = serde_json::from_str("\"assignToRole\"").unwrap();
        assert_eq!(field, TaskField::AssignToRole);
    }
}
