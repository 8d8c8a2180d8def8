use crossterm::event::KeyEvent;
use indexmap::IndexMap;

use crate::api::ApiError;
use crate::io::session::SessionError;
use crate::model::{FocusArea, Task};

/// Which screen is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppState {
    Loading,
    Login,
    FocusAreaList,
    FocusAreaForm,
    TaskList,
    TaskForm,
    Settings,
}

impl AppState {
    /// Every state, in registry order
    pub const ALL: [AppState; 7] = [
        AppState::Loading,
        AppState::Login,
        AppState::FocusAreaList,
        AppState::FocusAreaForm,
        AppState::TaskList,
        AppState::TaskForm,
        AppState::Settings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AppState::Loading => "loading",
            AppState::Login => "login",
            AppState::FocusAreaList => "focus-area-list",
            AppState::FocusAreaForm => "focus-area-form",
            AppState::TaskList => "task-list",
            AppState::TaskForm => "task-form",
            AppState::Settings => "settings",
        }
    }
}

/// Everything that can go wrong at runtime; the message is what the user sees
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{action}: {source}")]
    Api {
        action: &'static str,
        #[source]
        source: ApiError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Invalid(String),
}

impl AppError {
    pub fn api(action: &'static str, source: ApiError) -> Self {
        AppError::Api { action, source }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Invalid(message.into())
    }
}

/// One entry of a select input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl From<&FocusArea> for SelectOption {
    fn from(focus_area: &FocusArea) -> Self {
        SelectOption {
            label: focus_area.name.clone(),
            value: focus_area.id.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    /// Terminal size (full window when it reaches the dispatcher, content
    /// area once forwarded to views)
    Resized { width: u16, height: u16 },
    Key(KeyEvent),
    Quit,
    Error(AppError),
    /// Login succeeded with this token
    Authenticated(String),
    Navigate(AppState),
    Logout,
    /// Spinner frame; carries the generation that scheduled it
    Tick(u64),

    RefreshTasks,
    TasksLoaded(Vec<Task>),
    CreateTask,
    SelectTask(Task),
    TaskSaved,

    RefreshFocusAreas,
    FocusAreasLoaded(Vec<FocusArea>),
    /// Focus areas fetched for the task form's select input
    FocusAreaOptionsLoaded(Vec<FocusArea>),
    CreateFocusArea,
    EditFocusArea(FocusArea),
    FocusAreaSaved,

    SetFieldValue {
        form_id: &'static str,
        field_id: &'static str,
        value: String,
    },
    SetSelectOptions {
        form_id: &'static str,
        field_id: &'static str,
        options: Vec<SelectOption>,
    },
    FormSubmitted {
        form_id: &'static str,
        values: IndexMap<String, String>,
    },
}

impl Event {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Resized { .. } => "resized",
            Event::Key(_) => "key",
            Event::Quit => "quit",
            Event::Error(_) => "error",
            Event::Authenticated(_) => "authenticated",
            Event::Navigate(_) => "navigate",
            Event::Logout => "logout",
            Event::Tick(_) => "tick",
            Event::RefreshTasks => "refresh-tasks",
            Event::TasksLoaded(_) => "tasks-loaded",
            Event::CreateTask => "create-task",
            Event::SelectTask(_) => "select-task",
            Event::TaskSaved => "task-saved",
            Event::RefreshFocusAreas => "refresh-focus-areas",
            Event::FocusAreasLoaded(_) => "focus-areas-loaded",
            Event::FocusAreaOptionsLoaded(_) => "focus-area-options-loaded",
            Event::CreateFocusArea => "create-focus-area",
            Event::EditFocusArea(_) => "edit-focus-area",
            Event::FocusAreaSaved => "focus-area-saved",
            Event::SetFieldValue { .. } => "set-field-value",
            Event::SetSelectOptions { .. } => "set-select-options",
            Event::FormSubmitted { .. } => "form-submitted",
        }
    }
}
