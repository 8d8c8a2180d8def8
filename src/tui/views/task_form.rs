use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::debug;

use crate::api::Gateway;
use crate::model::{CreateTaskRequest, FocusArea, Task, UpdateTaskRequest};
use crate::tui::command::Command;
use crate::tui::event::{AppError, AppState, Event, SelectOption};
use crate::tui::form::{self, Form, FormField, SelectInput, TextInput};
use crate::tui::keys;
use crate::tui::render::{self, TITLE_HEIGHT};
use crate::tui::theme::Theme;

use super::{View, ViewContext};

pub const FORM_ID: &str = "taskform";
const SUMMARY: &str = "summary";
const NOTES: &str = "notes";
const FOCUS_AREA: &str = "focusarea";

/// Create or edit one task
pub struct TaskFormView {
    form: Form,
    /// Task being edited; `None` while creating
    draft: Option<Task>,
    gateway: Arc<Gateway>,
    theme: Rc<Theme>,
}

impl TaskFormView {
    pub fn new(ctx: &ViewContext) -> Self {
        let fields = vec![
            Box::new(TextInput::new(SUMMARY, "Summary")) as Box<dyn FormField>,
            Box::new(TextInput::new(NOTES, "Notes")),
            Box::new(SelectInput::new(FOCUS_AREA, "Focus area")),
        ];
        TaskFormView {
            form: Form::new(FORM_ID, Rc::clone(&ctx.theme), fields).with_help(&[keys::BACK]),
            draft: None,
            gateway: Arc::clone(&ctx.gateway),
            theme: Rc::clone(&ctx.theme),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    fn start(&mut self, draft: Option<Task>) -> Option<Command> {
        self.draft = draft;
        self.form.reset();
        let gateway = Arc::clone(&self.gateway);
        Some(Command::task(move || match gateway.list_focus_areas() {
            Ok(areas) => Some(Event::FocusAreaOptionsLoaded(areas)),
            Err(e) => Some(Event::Error(AppError::api("error fetching focus areas", e))),
        }))
    }

    /// Options first, then the field values that depend on them
    fn fill(&self, areas: &[FocusArea]) -> Option<Command> {
        let Some(first) = areas.first() else {
            return Some(Command::emit(Event::Error(AppError::invalid(
                "no focus areas available",
            ))));
        };
        let options: Vec<SelectOption> = areas.iter().map(SelectOption::from).collect();
        let values = match &self.draft {
            Some(task) => vec![
                Some(form::set_field_value(FORM_ID, SUMMARY, task.summary.clone())),
                Some(form::set_field_value(FORM_ID, NOTES, task.notes.clone())),
                Some(form::set_field_value(
                    FORM_ID,
                    FOCUS_AREA,
                    task.focus_area.id.to_string(),
                )),
            ],
            None => vec![Some(form::set_field_value(
                FORM_ID,
                FOCUS_AREA,
                first.id.to_string(),
            ))],
        };
        Command::sequence([
            Some(form::set_select_options(FORM_ID, FOCUS_AREA, options)),
            Command::batch(values),
        ])
    }

    fn submit(&self, values: &IndexMap<String, String>) -> Option<Command> {
        let field = |id: &str| values.get(id).map(String::as_str).unwrap_or_default();
        let summary = field(SUMMARY).trim().to_string();
        if summary.is_empty() {
            return Some(Command::emit(Event::Error(AppError::invalid(
                "summary is required",
            ))));
        }
        let Ok(focus_area_id) = field(FOCUS_AREA).parse::<u64>() else {
            return Some(Command::emit(Event::Error(AppError::invalid(
                "select a focus area",
            ))));
        };
        let notes = field(NOTES).to_string();
        let editing = self.draft.as_ref().map(|t| t.id);

        let gateway = Arc::clone(&self.gateway);
        Some(Command::task(move || {
            let result = match editing {
                Some(id) => gateway.update_task(
                    id,
                    &UpdateTaskRequest {
                        summary,
                        notes,
                        focus_area_id,
                    },
                ),
                None => gateway.create_task(&CreateTaskRequest {
                    summary,
                    notes,
                    focus_area_id,
                }),
            };
            match result {
                Ok(task) => {
                    debug!(task_id = task.id, "task saved");
                    Some(Event::TaskSaved)
                }
                Err(e) => Some(Event::Error(AppError::api("error saving task", e))),
            }
        }))
    }
}

impl View for TaskFormView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Resized { width, height } => {
                self.form
                    .set_size(*width, height.saturating_sub(TITLE_HEIGHT));
                None
            }
            Event::CreateTask => self.start(None),
            Event::SelectTask(task) => self.start(Some(task.clone())),
            Event::FocusAreaOptionsLoaded(areas) => self.fill(areas),
            Event::FormSubmitted { form_id, values } if *form_id == FORM_ID => self.submit(values),
            Event::TaskSaved => Some(Command::emit(Event::Navigate(AppState::TaskList))),
            Event::Key(key) if keys::BACK.matches(key) => {
                Some(Command::emit(Event::Navigate(AppState::TaskList)))
            }
            _ => self.form.handle_event(event),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        let label = if self.draft.is_some() {
            "Edit Task"
        } else {
            "New Task"
        };
        render::render_title(frame, title, &self.theme, label);
        self.form.render(frame, body);
    }

    fn blur(&mut self) -> Option<Command> {
        self.form.blur();
        None
    }

    fn focus(&mut self) -> Option<Command> {
        self.form.focus();
        None
    }
}
