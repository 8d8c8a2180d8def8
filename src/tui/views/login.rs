use std::rc::Rc;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::api::Gateway;
use crate::tui::command::Command;
use crate::tui::event::{AppError, Event};
use crate::tui::form::{Form, FormField, TextInput};
use crate::tui::keys;
use crate::tui::render::{self, TITLE_HEIGHT};
use crate::tui::theme::Theme;

use super::{View, ViewContext};

pub const FORM_ID: &str = "login";

pub struct LoginView {
    form: Form,
    gateway: Arc<Gateway>,
    theme: Rc<Theme>,
}

impl LoginView {
    pub fn new(ctx: &ViewContext) -> Self {
        let fields = vec![
            Box::new(TextInput::new("username", "Username")) as Box<dyn FormField>,
            Box::new(TextInput::new("password", "Password").hidden()),
        ];
        LoginView {
            form: Form::new(FORM_ID, Rc::clone(&ctx.theme), fields).with_help(&[keys::QUIT]),
            gateway: Arc::clone(&ctx.gateway),
            theme: Rc::clone(&ctx.theme),
        }
    }

    fn submit(&mut self, username: &str, password: &str) -> Option<Command> {
        let username = username.trim().to_string();
        if username.is_empty() || password.is_empty() {
            return Some(Command::emit(Event::Error(AppError::invalid(
                "username and password are required",
            ))));
        }
        let password = password.to_string();
        self.form.set_value("password", "");

        let gateway = Arc::clone(&self.gateway);
        Some(Command::task(move || {
            info!(username = %username, "logging in");
            match gateway.login(&username, &password) {
                Ok(token) => Some(Event::Authenticated(token)),
                Err(e) => {
                    warn!(error = %e, "login failed");
                    Some(Event::Error(AppError::api("login failed", e)))
                }
            }
        }))
    }
}

impl View for LoginView {
    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Resized { width, height } => {
                self.form
                    .set_size(*width, height.saturating_sub(TITLE_HEIGHT));
                None
            }
            Event::FormSubmitted { form_id, values } if *form_id == FORM_ID => {
                let username = values.get("username").cloned().unwrap_or_default();
                let password = values.get("password").cloned().unwrap_or_default();
                self.submit(&username, &password)
            }
            _ => self.form.handle_event(event),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, body) = render::split_title(area);
        render::render_title(frame, title, &self.theme, "Log in to soq");
        self.form.render(frame, body);
    }

    fn blur(&mut self) -> Option<Command> {
        self.form.blur();
        None
    }

    fn focus(&mut self) -> Option<Command> {
        self.form.reset();
        self.form.focus();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::FakeTransport;
    use crate::tui::render::test_helpers::{render_to_buffer, render_to_string};
    use crate::tui::views::test_support::{code, context, key, run};
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    fn type_str(view: &mut LoginView, s: &str) {
        for c in s.chars() {
            view.handle_event(&key(c));
        }
    }

    #[test]
    fn submit_logs_in_and_clears_password() {
        let fake = FakeTransport::new().respond(200, r#"{"token":"abc"}"#);
        let (ctx, _dir) = context(fake.clone());
        let mut view = LoginView::new(&ctx);
        type_str(&mut view, "alice");
        view.handle_event(&code(KeyCode::Tab));
        type_str(&mut view, "secret");

        let cmd = view.handle_event(&code(KeyCode::Enter));
        let seen = run(&mut view, cmd);
        assert_eq!(seen, vec!["form-submitted", "authenticated"]);
        assert_eq!(view.form.value("password").as_deref(), Some(""));
        assert_eq!(view.form.value("username").as_deref(), Some("alice"));

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/auth/token");
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({"username": "alice", "password": "secret"}))
        );
    }

    #[test]
    fn missing_credentials_are_rejected_locally() {
        let fake = FakeTransport::new();
        let (ctx, _dir) = context(fake.clone());
        let mut view = LoginView::new(&ctx);
        type_str(&mut view, "alice");
        let cmd = view.handle_event(&code(KeyCode::Enter));
        let seen = run(&mut view, cmd);
        assert_eq!(
            seen,
            vec!["form-submitted", "error:username and password are required"]
        );
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn rejected_login_surfaces_error() {
        let fake = FakeTransport::new().respond(401, "");
        let (ctx, _dir) = context(fake);
        let mut view = LoginView::new(&ctx);
        type_str(&mut view, "alice");
        view.handle_event(&code(KeyCode::Tab));
        type_str(&mut view, "wrong");
        let cmd = view.handle_event(&code(KeyCode::Enter));
        let seen = run(&mut view, cmd);
        assert_eq!(seen, vec!["form-submitted", "error:login failed: unauthorized"]);
    }

    #[test]
    fn focus_clears_previous_input() {
        let (ctx, _dir) = context(FakeTransport::new());
        let mut view = LoginView::new(&ctx);
        type_str(&mut view, "bob");
        view.focus();
        assert_eq!(view.form.value("username").as_deref(), Some(""));
    }

    #[test]
    fn blur_and_focus_move_input_focus() {
        let (ctx, _dir) = context(FakeTransport::new());
        let mut view = LoginView::new(&ctx);
        view.handle_event(&Event::Resized {
            width: 60,
            height: 12,
        });
        // Top-left border cell of the username box, below the title
        let border = |view: &LoginView| {
            let buf = render_to_buffer(60, 12, |frame, area| view.render(frame, area));
            buf.cell((0, TITLE_HEIGHT)).map(|cell| cell.fg)
        };

        view.blur();
        assert_eq!(border(&view), Some(ctx.theme.border));
        view.focus();
        assert_eq!(border(&view), Some(ctx.theme.highlight));
    }

    #[test]
    fn renders_title_and_fields() {
        let (ctx, _dir) = context(FakeTransport::new());
        let mut view = LoginView::new(&ctx);
        view.handle_event(&Event::Resized {
            width: 60,
            height: 12,
        });
        let out = render_to_string(60, 12, |frame, area| view.render(frame, area));
        assert!(out.starts_with("Log in to soq"));
        assert!(out.contains("Username"));
        assert!(out.contains("Password"));
    }
}
