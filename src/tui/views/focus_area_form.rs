use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::api::Gateway;
use crate::model::{CreateFocusAreaRequest, FocusArea, UpdateFocusAreaRequest};
use crate::tui::command::Command;
use crate::tui::event::{AppError, AppState, Event};
use crate::tui::form::{Form, FormField, TextInput};
use crate::tui::keys;
use crate::tui::render::{self, TITLE_HEIGHT};
use crate::tui::theme::Theme;

use super::{View, ViewContext};

pub const FORM_ID: &str = "focusareaform";
const NAME: &str = "name";

pub struct FocusAreaFormView {
    form: Form,
    /// Focus area being renamed; `None` while creating
    draft: Option<FocusArea>,
    gateway: Arc<Gateway>,
    theme: Rc<Theme>,
}

impl FocusAreaFormView {
    pub fn new(ctx: &ViewContext) -> Self {
        let fields = vec![Box::new(TextInput::new(NAME, "Name")) as Box<dyn FormField>];
        FocusAreaFormView {
            form: Form::new(FORM_ID, Rc::clone(&ctx.theme), fields).with_help(&[keys::BACK]),
            draft: None,
            gateway: Arc::clone(&ctx.gateway),
            theme: Rc::clone(&ctx.theme),
        }
    }

    fn submit(&self, values: &IndexMap<String, String>) -> Option<Command> {
        let name = values
            .get(NAME)
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            return Some(Command::emit(Event::Error(AppError::invalid(
                "name is required",
            ))));
        }
        let editing = self.draft.as_ref().map(|a| a.id);
        let gateway = Arc::clone(&self.gateway);
        Some(Command::task(move || {
            let result = match editing {
                Some(id) => gateway.update_focus_area(id, &UpdateFocusAreaRequest { name }),
                None => gateway.create_focus_area(&CreateFocusAreaRequest { name }),
            };
            match result {
                Ok(_) => Some(Event::FocusAreaSaved),
                Err(e) => Some(Event::Error(AppError::api("error saving focus area", e))),
            }
        }))
    }
}

impl View for FocusAreaFormView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Resized { width, height } => {
                self.form
                    .set_size(*width, height.saturating_sub(TITLE_HEIGHT));
                None
            }
            Event::CreateFocusArea => {
                self.draft = None;
                self.form.reset();
                None
            }
            Event::EditFocusArea(area) => {
                self.draft = Some(area.clone());
                self.form.reset();
                self.form.set_value(NAME, &area.name);
                None
            }
            Event::FormSubmitted { form_id, values } if *form_id == FORM_ID => self.submit(values),
            Event::FocusAreaSaved => Some(Command::emit(Event::Navigate(AppState::FocusAreaList))),
            Event::Key(key) if keys::BACK.matches(key) => {
                Some(Command::emit(Event::Navigate(AppState::FocusAreaList)))
            }
            _ => self.form.handle_event(event),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        let label = if self.draft.is_some() {
            "Edit Focus Area"
        } else {
            "New Focus Area"
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
