use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::command::Command;
use crate::tui::event::{AppState, Event};
use crate::tui::keys;
use crate::tui::render::{self, help_bar};
use crate::tui::theme::Theme;

use super::{View, ViewContext};

const HELP: [keys::KeyBinding; 4] = [keys::FOCUS_AREAS, keys::LOGOUT, keys::BACK, keys::QUIT];

pub struct SettingsView {
    api_url: String,
    theme: Rc<Theme>,
}

impl SettingsView {
    pub fn new(ctx: &ViewContext) -> Self {
        SettingsView {
            api_url: ctx.api_url.clone(),
            theme: Rc::clone(&ctx.theme),
        }
    }
}

impl View for SettingsView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        let Event::Key(key) = event else {
            return None;
        };
        if keys::FOCUS_AREAS.matches(key) {
            Some(Command::emit(Event::Navigate(AppState::FocusAreaList)))
        } else if keys::LOGOUT.matches(key) {
            Some(Command::emit(Event::Logout))
        } else if keys::BACK.matches(key) {
            Some(Command::emit(Event::Navigate(AppState::TaskList)))
        } else {
            None
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        let (body, help) = render::split_help(body);
        render::render_title(frame, title, &self.theme, "Settings");

        let label = Style::default().fg(self.theme.dim).bg(self.theme.background);
        let value = Style::default().fg(self.theme.text_bright).bg(self.theme.background);
        let lines = vec![Line::from(vec![
            Span::styled("Server  ", label),
            Span::styled(self.api_url.clone(), value),
        ])];
        frame.render_widget(Paragraph::new(lines), body);
        help_bar::render_help_bar(frame, help, &self.theme, &HELP);
    }
}
