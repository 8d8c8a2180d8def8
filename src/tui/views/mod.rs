//! One view per screen. Views own their presentation state, react to
//! events by returning commands, and never do I/O while rendering.

pub mod focus_area_form;
pub mod focus_area_list;
pub mod loading;
pub mod login;
pub mod settings;
pub mod task_form;
pub mod task_list;

use std::rc::Rc;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::api::Gateway;

use super::command::Command;
use super::event::{AppState, Event};
use super::theme::Theme;

pub use focus_area_form::FocusAreaFormView;
pub use focus_area_list::FocusAreaListView;
pub use loading::LoadingView;
pub use login::LoginView;
pub use settings::SettingsView;
pub use task_form::TaskFormView;
pub use task_list::TaskListView;

pub trait View {
    /// Startup work, run once before the first navigation
    fn init(&mut self) -> Option<Command> {
        None
    }

    fn handle_event(&mut self, event: &Event) -> Option<Command>;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Called when this view stops being the active one
    fn blur(&mut self) -> Option<Command> {
        None
    }

    /// Called when this view becomes the active one
    fn focus(&mut self) -> Option<Command> {
        None
    }
}

/// Maps every state to its view
pub trait ViewRegistry {
    fn get(&self, state: AppState) -> &dyn View;
    fn get_mut(&mut self, state: AppState) -> &mut dyn View;
}

/// What views need from the outside world
#[derive(Clone)]
pub struct ViewContext {
    pub gateway: Arc<Gateway>,
    pub theme: Rc<Theme>,
    pub api_url: String,
}

/// The application's screens, one field per state
pub struct Views {
    pub loading: LoadingView,
    pub login: LoginView,
    pub focus_area_list: FocusAreaListView,
    pub focus_area_form: FocusAreaFormView,
    pub task_list: TaskListView,
    pub task_form: TaskFormView,
    pub settings: SettingsView,
}

impl Views {
    pub fn new(ctx: &ViewContext) -> Self {
        Views {
            loading: LoadingView::new(ctx),
            login: LoginView::new(ctx),
            focus_area_list: FocusAreaListView::new(ctx),
            focus_area_form: FocusAreaFormView::new(ctx),
            task_list: TaskListView::new(ctx),
            task_form: TaskFormView::new(ctx),
            settings: SettingsView::new(ctx),
        }
    }
}

impl ViewRegistry for Views {
    fn get(&self, state: AppState) -> &dyn View {
        match state {
            AppState::Loading => &self.loading,
            AppState::Login => &self.login,
            AppState::FocusAreaList => &self.focus_area_list,
            AppState::FocusAreaForm => &self.focus_area_form,
            AppState::TaskList => &self.task_list,
            AppState::TaskForm => &self.task_form,
            AppState::Settings => &self.settings,
        }
    }

    fn get_mut(&mut self, state: AppState) -> &mut dyn View {
        match state {
            AppState::Loading => &mut self.loading,
            AppState::Login => &mut self.login,
            AppState::FocusAreaList => &mut self.focus_area_list,
            AppState::FocusAreaForm => &mut self.focus_area_form,
            AppState::TaskList => &mut self.task_list,
            AppState::TaskForm => &mut self.task_form,
            AppState::Settings => &mut self.settings,
        }
    }
}

/// Items plus a cursor that stays in range as the items change
#[derive(Debug)]
pub struct ItemList<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        ItemList {
            items: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T> ItemList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }
}

/// Navigate after `first` has been dispatched
pub(crate) fn then_navigate(first: Event, state: AppState) -> Option<Command> {
    Command::sequence([
        Some(Command::emit(first)),
        Some(Command::emit(Event::Navigate(state))),
    ])
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use crate::api::test_support::{FakeTransport, gateway_with};
    use crate::tui::command::{Command, Runtime};
    use crate::tui::event::Event;
    use crate::tui::theme::Theme;

    use super::{View, ViewContext};

    pub fn context(fake: FakeTransport) -> (ViewContext, TempDir) {
        let (gateway, dir) = gateway_with(fake, Some("tok"));
        let ctx = ViewContext {
            gateway: Arc::new(gateway),
            theme: Rc::new(Theme::default()),
            api_url: "http://localhost:8080".into(),
        };
        (ctx, dir)
    }

    pub fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    pub fn code(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Run `command` inline, feeding every event back into `view`, and
    /// return the kinds of all events that came out (navigations by state)
    pub fn run(view: &mut dyn View, command: Option<Command>) -> Vec<String> {
        let mut seen = Vec::new();
        let Some(command) = command else {
            return seen;
        };
        let mut runtime = Runtime::inline();
        runtime.execute(command);
        runtime.drain(|event| {
            seen.push(describe(&event));
            view.handle_event(&event)
        });
        seen
    }

    pub fn describe(event: &Event) -> String {
        match event {
            Event::Navigate(state) => format!("nav:{}", state.name()),
            Event::Error(err) => format!("error:{err}"),
            other => other.kind().to_string(),
        }
    }
}
