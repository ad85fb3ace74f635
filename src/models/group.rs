use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskGroupType {
    #[serde(rename = "One-time")]
    OneTime,
    Repetitive,
}

impl TaskGroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "One-time",
            Self::Repetitive => "Repetitive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "One-time" => Some(Self::OneTime),
            "Repetitive" => Some(Self::Repetitive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskGroupStatus {
    Planned,
    Active,
    Completed,
}

impl TaskGroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Planned" => Some(Self::Planned),
            "Active" => Some(Self::Active),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Status only moves forward; staying put is allowed.
    pub fn can_become(&self, next: TaskGroupStatus) -> bool {
        *self <= next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPattern {
    Daily,
    Weekly,
    Monthly,
}

impl RepeatPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// A task embedded in a group. Only addressable through its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroupTask {
    pub id: Ulid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<String>,
    pub assign_to_role: String,
    #[serde(default)]
    pub scheduling_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_pattern: Option<RepeatPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_to: Option<String>,
    #[serde(default)]
    pub dependent_steps: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_on: String,
    #[serde(rename = "typeOfTG")]
    pub type_of_tg: TaskGroupType,
    #[serde(default)]
    pub tg_type: String,
    /// Task count at save time; not kept in sync afterwards.
    #[serde(default)]
    pub number_of_tasks: String,
    pub unit: String,
    pub department: String,
    pub status: TaskGroupStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskGroupTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        use TaskGroupStatus::*;
        assert!(Planned.can_become(Active));
        assert!(Planned.can_become(Completed));
        assert!(Active.can_become(Completed));
        assert!(Active.can_become(Active));
        assert!(!Completed.can_become(Planned));
        assert!(!Active.can_become(Planned));
    }

    #[test]
    fn test_group_type_labels() {
        assert_eq!(TaskGroupType::from_str("One-time"), Some(TaskGroupType::OneTime));
        assert_eq!(TaskGroupType::from_str("one-time"), None);
        assert_eq!(
            serde_json::to_value(TaskGroupType::OneTime).unwrap(),
            serde_json::json!("One-time")
        );
    }

    #[test]
    fn test_group_serializes_with_dashboard_keys() {
        let group = TaskGroup {
            id: "TG-001".into(),
            name: "Audit".into(),
            created_by: "Admin".into(),
            created_on: "2024-01-01".into(),
            type_of_tg: TaskGroupType::Repetitive,
            tg_type: "Internal Orders".into(),
            number_of_tasks: "0".into(),
            unit: "Unit 1".into(),
            department: "Production".into(),
            status: TaskGroupStatus::Planned,
            description: None,
            start_date_time: None,
            tasks: Vec::new(),
        };
        let v = serde_json::to_value(&group).unwrap();
        assert_eq!(v["typeOfTG"], "Repetitive");
        assert_eq!(v["tgType"], "Internal Orders");
        assert_eq!(v["numberOfTasks"], "0");
        assert_eq!(v["status"], "Planned");
        assert!(v.get("description").is_none());
    }
}
