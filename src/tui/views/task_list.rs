use std::rc::Rc;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::debug;

use crate::api::Gateway;
use crate::model::Task;
use crate::tui::command::Command;
use crate::tui::event::{AppError, AppState, Event};
use crate::tui::keys;
use crate::tui::render::{self, help_bar, list};
use crate::tui::theme::Theme;

use super::{ItemList, View, ViewContext, then_navigate};

const HELP: [keys::KeyBinding; 8] = [
    keys::UP,
    keys::DOWN,
    keys::NEW,
    keys::EDIT,
    keys::RESOLVE,
    keys::DELETE,
    keys::SETTINGS,
    keys::QUIT,
];

/// "My Tasks": every task of the signed-in user
pub struct TaskListView {
    tasks: ItemList<Task>,
    gateway: Arc<Gateway>,
    theme: Rc<Theme>,
}

impl TaskListView {
    pub fn new(ctx: &ViewContext) -> Self {
        TaskListView {
            tasks: ItemList::default(),
            gateway: Arc::clone(&ctx.gateway),
            theme: Rc::clone(&ctx.theme),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.items()
    }

    fn fetch(&self) -> Command {
        let gateway = Arc::clone(&self.gateway);
        Command::task(move || match gateway.list_tasks() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks fetched");
                Some(Event::TasksLoaded(tasks))
            }
            Err(e) => Some(Event::Error(AppError::api("error fetching tasks", e))),
        })
    }

    fn no_selection() -> Option<Command> {
        Some(Command::emit(Event::Error(AppError::invalid(
            "no task selected",
        ))))
    }

    /// Run a gateway call on the selected task, then refetch on success
    fn on_selected<F>(&self, action: &'static str, call: F) -> Option<Command>
    where
        F: FnOnce(&Gateway, u64) -> Result<(), crate::api::ApiError> + Send + 'static,
    {
        let Some(task) = self.tasks.selected() else {
            return Self::no_selection();
        };
        let id = task.id;
        let gateway = Arc::clone(&self.gateway);
        Some(Command::task(move || match call(&gateway, id) {
            Ok(()) => Some(Event::RefreshTasks),
            Err(e) => Some(Event::Error(AppError::api(action, e))),
        }))
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> Option<Command> {
        if keys::is_up(key) {
            self.tasks.move_up();
            None
        } else if keys::is_down(key) {
            self.tasks.move_down();
            None
        } else if keys::NEW.matches(key) {
            then_navigate(Event::CreateTask, AppState::TaskForm)
        } else if keys::EDIT.matches(key) {
            match self.tasks.selected() {
                Some(task) => then_navigate(Event::SelectTask(task.clone()), AppState::TaskForm),
                None => Self::no_selection(),
            }
        } else if keys::DELETE.matches(key) {
            self.on_selected("error deleting task", |gateway, id| gateway.delete_task(id))
        } else if keys::RESOLVE.matches(key) {
            self.on_selected("error resolving task", |gateway, id| {
                gateway.resolve_task(id).map(|_| ())
            })
        } else if keys::SETTINGS.matches(key) {
            Some(Command::emit(Event::Navigate(AppState::Settings)))
        } else {
            None
        }
    }
}

impl View for TaskListView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::RefreshTasks => Some(self.fetch()),
            Event::TasksLoaded(tasks) => {
                self.tasks.set_items(tasks.clone());
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        let (body, help) = render::split_help(body);
        render::render_title(frame, title, &self.theme, "My Tasks");

        let labels: Vec<String> = self
            .tasks
            .items()
            .iter()
            .map(|t| {
                if t.focus_area.name.is_empty() {
                    format!("{} {}", t.status.marker(), t.summary)
                } else {
                    format!("{} {}  ({})", t.status.marker(), t.summary, t.focus_area.name)
                }
            })
            .collect();
        list::render_list(
            frame,
            body,
            &self.theme,
            &labels,
            self.tasks.cursor(),
            "No tasks yet. Press n to create one.",
        );
        help_bar::render_help_bar(frame, help, &self.theme, &HELP);
    }

    fn focus(&mut self) -> Option<Command> {
        Some(self.fetch())
    }
}
