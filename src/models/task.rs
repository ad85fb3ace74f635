use serde::{Deserialize, Serialize};

/// A record in the task repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_on: String,
    #[serde(rename = "type", default)]
    pub task_type: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
