use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::api::Gateway;
use crate::model::FocusArea;
use crate::tui::command::Command;
use crate::tui::event::{AppError, AppState, Event};
use crate::tui::keys;
use crate::tui::render::{self, help_bar, list};
use crate::tui::theme::Theme;

use super::{ItemList, View, ViewContext, then_navigate};

const HELP: [keys::KeyBinding; 7] = [
    keys::UP,
    keys::DOWN,
    keys::NEW,
    keys::EDIT,
    keys::DELETE,
    keys::BACK,
    keys::QUIT,
];

pub struct FocusAreaListView {
    areas: ItemList<FocusArea>,
    gateway: Arc<Gateway>,
    theme: Rc<Theme>,
}

impl FocusAreaListView {
    pub fn new(ctx: &ViewContext) -> Self {
        FocusAreaListView {
            areas: ItemList::default(),
            gateway: Arc::clone(&ctx.gateway),
            theme: Rc::clone(&ctx.theme),
        }
    }

    pub fn focus_areas(&self) -> &[FocusArea] {
        self.areas.items()
    }

    fn fetch(&self) -> Command {
        let gateway = Arc::clone(&self.gateway);
        Command::task(move || match gateway.list_focus_areas() {
            Ok(areas) => Some(Event::FocusAreasLoaded(areas)),
            Err(e) => Some(Event::Error(AppError::api("error fetching focus areas", e))),
        })
    }

    fn no_selection() -> Option<Command> {
        Some(Command::emit(Event::Error(AppError::invalid(
            "no focus area selected",
        ))))
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Command> {
        if keys::is_up(key) {
            self.areas.move_up();
            None
        } else if keys::is_down(key) {
            self.areas.move_down();
            None
        } else if keys::BACK.matches(key) {
            Some(Command::emit(Event::Navigate(AppState::Settings)))
        } else if keys::NEW.matches(key) {
            then_navigate(Event::CreateFocusArea, AppState::FocusAreaForm)
        } else if keys::EDIT.matches(key) {
            match self.areas.selected() {
                Some(area) => {
                    then_navigate(Event::EditFocusArea(area.clone()), AppState::FocusAreaForm)
                }
                None => Self::no_selection(),
            }
        } else if keys::DELETE.matches(key) {
            let Some(area) = self.areas.selected() else {
                return Self::no_selection();
            };
            let id = area.id;
            let gateway = Arc::clone(&self.gateway);
            Some(Command::task(move || match gateway.delete_focus_area(id) {
                Ok(()) => Some(Event::RefreshFocusAreas),
                Err(e) => Some(Event::Error(AppError::api("error deleting focus area", e))),
            }))
        } else {
            None
        }
    }
}

impl View for FocusAreaListView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::RefreshFocusAreas => Some(self.fetch()),
            Event::FocusAreasLoaded(areas) => {
                self.areas.set_items(areas.clone());
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        let (body, help) = render::split_help(body);
        render::render_title(frame, title, &self.theme, "Focus Areas");
        let labels: Vec<String> = self.areas.items().iter().map(|a| a.name.clone()).collect();
        list::render_list(
            frame,
            body,
            &self.theme,
            &labels,
            self.areas.cursor(),
            "No focus areas yet. Press n to create one.",
        );
        help_bar::render_help_bar(frame, help, &self.theme, &HELP);
    }

    fn focus(&mut self) -> Option<Command> {
        Some(self.fetch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::api::test_support::FakeTransport;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};
    use crate::tui::views::test_support::{code, context, key, run};
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    const AREAS: &str = r#"[{"id":1,"name":"Work"},{"id":2,"name":"Home"}]"#;

    #[test]
    fn focus_fetches_and_delete_refetches() {
        let fake = FakeTransport::new()
            .respond(200, AREAS)
            .respond(204, "")
            .respond(200, r#"[{"id":2,"name":"Home"}]"#);
        let (ctx, _dir) = context(fake.clone());
        let mut view = FocusAreaListView::new(&ctx);
        let cmd = view.focus();
        run(&mut view, cmd);
        assert_eq!(view.focus_areas().len(), 2);

        let cmd = view.handle_event(&key('d'));
        let seen = run(&mut view, cmd);
        assert_eq!(seen, vec!["refresh-focus-areas", "focus-areas-loaded"]);
        assert_eq!(view.focus_areas().len(), 1);

        let requests = fake.requests();
        assert_eq!(requests[0].path, "/focusareas");
        assert_eq!(requests[1].method, Method::Delete);
        assert_eq!(requests[1].path, "/focusareas/1");
    }

    #[test]
    fn edit_and_new_navigate_to_form() {
        let fake = FakeTransport::new().respond(200, AREAS);
        let (ctx, _dir) = context(fake);
        let mut view = FocusAreaListView::new(&ctx);
        let cmd = view.focus();
        run(&mut view, cmd);

        let Some(Command::Sequence(steps)) = view.handle_event(&key('e')) else {
            panic!("expected a sequence");
        };
        assert!(matches!(&steps[0], Command::Emit(Event::EditFocusArea(a)) if a.name == "Work"));
        let Some(Command::Sequence(steps)) = view.handle_event(&key('n')) else {
            panic!("expected a sequence");
        };
        assert!(matches!(&steps[0], Command::Emit(Event::CreateFocusArea)));
        assert!(matches!(
            &steps[1],
            Command::Emit(Event::Navigate(AppState::FocusAreaForm))
        ));
    }

    #[test]
    fn esc_returns_to_settings() {
        let (ctx, _dir) = context(FakeTransport::new());
        let mut view = FocusAreaListView::new(&ctx);
        assert!(matches!(
            view.handle_event(&code(KeyCode::Esc)),
            Some(Command::Emit(Event::Navigate(AppState::Settings)))
        ));
    }

    #[test]
    fn renders_empty_placeholder() {
        let (ctx, _dir) = context(FakeTransport::new());
        let view = FocusAreaListView::new(&ctx);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| view.render(frame, area));
        assert!(out.starts_with("Focus Areas"));
        assert!(out.contains("No focus areas yet."));
        assert!(out.contains("esc back  ctrl+c quit"));
    }
}
