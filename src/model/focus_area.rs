use serde::{Deserialize, Serialize};

/// A focus area groups tasks (e.g. "Work", "Home")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusArea {
    pub id: u64,
    pub name: String,
}

/// Body of `POST /focusareas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFocusAreaRequest {
    pub name: String,
}

/// Body of `PATCH /focusareas/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFocusAreaRequest {
    pub name: String,
}
