//! Multi-field forms: a focused field receives keys, Tab cycles focus,
//! Enter submits every field's value.

pub mod select_input;
pub mod side_panel;
pub mod text_input;

use std::rc::Rc;

use crossterm::event::KeyEvent;
use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::command::Command;
use super::event::{Event, SelectOption};
use super::keys::{self, KeyBinding};
use super::render::help_bar;
use super::theme::Theme;

pub use select_input::SelectInput;
pub use side_panel::{PANEL_WIDTH, SidePanel};
pub use text_input::TextInput;

/// Rows reserved for the key help line at the bottom of a form
pub const HELP_HEIGHT: u16 = 1;

/// Identifies which form an external field command targets
pub type FormId = &'static str;

/// One input inside a form
pub trait FormField {
    fn id(&self) -> &'static str;
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn focus(&mut self);
    fn blur(&mut self);
    /// Apply a key while focused
    fn handle_key(&mut self, key: &KeyEvent);
    /// Field-targeted events other than plain value updates
    fn handle_event(&mut self, _event: &Event) {}
    fn set_width(&mut self, width: u16);
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Whether the field shows extra content in the side panel while focused
    fn has_panel(&self) -> bool {
        false
    }
    fn set_panel_size(&mut self, _width: u16, _height: u16) {}
    fn render_panel(&self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}
}

pub struct Form {
    id: FormId,
    fields: Vec<Box<dyn FormField>>,
    focused: usize,
    /// Whether the focused field holds input focus
    active: bool,
    panel: SidePanel,
    extra_help: Vec<KeyBinding>,
    theme: Rc<Theme>,
    width: u16,
    height: u16,
}

impl Form {
    pub fn new(id: FormId, theme: Rc<Theme>, fields: Vec<Box<dyn FormField>>) -> Self {
        let mut form = Form {
            id,
            fields,
            focused: 0,
            active: true,
            panel: SidePanel::new(),
            extra_help: Vec::new(),
            theme,
            width: 0,
            height: 0,
        };
        if let Some(field) = form.fields.first_mut() {
            field.focus();
        }
        form.relayout();
        form
    }

    /// Additional bindings shown after the form's own in the help line
    pub fn with_help(mut self, bindings: &[KeyBinding]) -> Self {
        self.extra_help = bindings.to_vec();
        self
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn focused_field(&self) -> Option<&'static str> {
        self.fields.get(self.focused).map(|f| f.id())
    }

    pub fn value(&self, field_id: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.id() == field_id)
            .map(|f| f.value())
    }

    /// Current values keyed by field id, in field order
    pub fn values(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.id().to_string(), f.value()))
            .collect()
    }

    pub fn set_value(&mut self, field_id: &str, value: &str) {
        if let Some(field) = self.field_mut(field_id) {
            field.set_value(value);
        }
    }

    /// Give input focus back to the focused field
    pub fn focus(&mut self) {
        self.active = true;
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.focus();
        }
    }

    /// Release input focus; the focused index is kept
    pub fn blur(&mut self) {
        self.active = false;
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.blur();
        }
    }

    /// Empty every field and put focus back on the first one
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.set_value("");
        }
        self.focus_index(0);
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.relayout();
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Resized { width, height } => {
                self.set_size(*width, *height);
                None
            }
            Event::Key(key) => self.handle_key(key),
            Event::SetFieldValue {
                form_id,
                field_id,
                value,
            } if *form_id == self.id => {
                self.set_value(field_id, value);
                None
            }
            Event::SetSelectOptions {
                form_id, field_id, ..
            } if *form_id == self.id => {
                if let Some(field) = self.field_mut(field_id) {
                    field.handle_event(event);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Command> {
        if keys::NEXT_FIELD.matches(key) {
            self.cycle(1);
            None
        } else if keys::PREV_FIELD.matches(key) {
            self.cycle(-1);
            None
        } else if keys::SUBMIT.matches(key) {
            Some(Command::emit(Event::FormSubmitted {
                form_id: self.id,
                values: self.values(),
            }))
        } else {
            if let Some(field) = self.fields.get_mut(self.focused) {
                field.handle_key(key);
            }
            None
        }
    }

    fn field_mut(&mut self, field_id: &str) -> Option<&mut Box<dyn FormField>> {
        self.fields.iter_mut().find(|f| f.id() == field_id)
    }

    fn cycle(&mut self, step: isize) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        let next = (self.focused as isize + step).rem_euclid(len as isize) as usize;
        self.focus_index(next);
    }

    fn focus_index(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.blur();
        }
        self.focused = index;
        if self.active
            && let Some(field) = self.fields.get_mut(self.focused)
        {
            field.focus();
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        let open = self
            .fields
            .get(self.focused)
            .is_some_and(|f| f.has_panel());
        self.panel.set_open(open);
        let panel_height = self.height.saturating_sub(HELP_HEIGHT);
        self.panel.set_size(PANEL_WIDTH, panel_height);
        let (inner_w, inner_h) = self.panel.inner_size();

        let field_width = if open {
            self.width.saturating_sub(PANEL_WIDTH)
        } else {
            self.width
        };
        for field in &mut self.fields {
            field.set_width(field_width);
            field.set_panel_size(inner_w, inner_h);
        }
    }

    /// Width currently assigned to the fields
    pub fn field_width(&self) -> u16 {
        self.fields.first().map_or(self.width, |f| f.width())
    }

    /// Outer size of the side panel, `None` while closed
    pub fn panel_size(&self) -> Option<(u16, u16)> {
        self.panel.is_open().then(|| self.panel.size())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(HELP_HEIGHT)])
            .split(area);

        let (fields_area, panel_area) = if self.panel.is_open() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(PANEL_WIDTH)])
                .split(rows[0]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[0], None)
        };

        let mut y = fields_area.y;
        let bottom = fields_area.y + fields_area.height;
        for field in &self.fields {
            if y >= bottom {
                break;
            }
            let h = field.height().min(bottom - y);
            let rect = Rect::new(fields_area.x, y, fields_area.width, h);
            field.render(frame, rect, &self.theme);
            y += h;
        }

        if let (Some(panel_area), Some(field)) = (panel_area, self.fields.get(self.focused)) {
            self.panel
                .render(frame, panel_area, &self.theme, field.as_ref());
        }

        let mut bindings = vec![keys::NEXT_FIELD, keys::PREV_FIELD, keys::SUBMIT];
        bindings.extend_from_slice(&self.extra_help);
        help_bar::render_help_bar(frame, rows[1], &self.theme, &bindings);
    }
}

/// Command that sets a field's value on the form with `form_id`
pub fn set_field_value(form_id: FormId, field_id: &'static str, value: impl Into<String>) -> Command {
    Command::emit(Event::SetFieldValue {
        form_id,
        field_id,
        value: value.into(),
    })
}

/// Command that replaces a select field's options on the form with `form_id`
pub fn set_select_options(
    form_id: FormId,
    field_id: &'static str,
    options: Vec<SelectOption>,
) -> Command {
    Command::emit(Event::SetSelectOptions {
        form_id,
        field_id,
        options,
    })
}
