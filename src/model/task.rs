use serde::{Deserialize, Serialize};

use super::focus_area::FocusArea;

/// Lifecycle status reported by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Open,
    Closed,
    /// Any status this client doesn't know about
    #[serde(other)]
    Other,
}

impl TaskStatus {
    /// Marker shown in front of the task summary in lists
    pub fn marker(self) -> &'static str {
        match self {
            TaskStatus::Open => "[ ]",
            TaskStatus::Closed => "[x]",
            TaskStatus::Other => "[?]",
        }
    }
}

/// A task as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub focus_area: FocusArea,
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub summary: String,
    pub notes: String,
    pub focus_area_id: u64,
}

/// Body of `PATCH /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub summary: String,
    pub notes: String,
    pub focus_area_id: u64,
}
