//! End-to-end screen flows against a scripted backend, with the command
//! runtime in inline mode.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::TempDir;

use soq_tui::api::{ApiError, ApiRequest, ApiResponse, Gateway, Transport};
use soq_tui::io::session::{Session, SharedSession};
use soq_tui::tui::App;
use soq_tui::tui::command::Runtime;
use soq_tui::tui::event::{AppState, Event};
use soq_tui::tui::theme::Theme;
use soq_tui::tui::views::{ViewContext, Views};

/// Replies keyed by "METHOD /path"; each route's last reply repeats
#[derive(Clone, Default)]
struct Backend {
    routes: Arc<Mutex<HashMap<String, VecDeque<ApiResponse>>>>,
    log: Arc<Mutex<Vec<ApiRequest>>>,
}

impl Backend {
    fn on(self, route: &str, status: u16, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back(ApiResponse {
                status,
                body: body.to_string(),
            });
        self
    }

    fn calls(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.path))
            .collect()
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }
}

impl Transport for Backend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.log.lock().unwrap().push(request.clone());
        let route = format!("{} {}", request.method.as_str(), request.path);
        let mut routes = self.routes.lock().unwrap();
        let Some(replies) = routes.get_mut(&route) else {
            return Err(ApiError::Transport(format!("no route for {route}")));
        };
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or_else(|| ApiError::Transport(format!("no reply for {route}")))
    }
}

struct Client {
    app: App,
    runtime: Runtime,
    session: SharedSession,
    dir: TempDir,
}

impl Client {
    fn start(backend: &Backend, token: Option<&str>) -> Client {
        let dir = TempDir::new().unwrap();
        if let Some(token) = token {
            std::fs::write(dir.path().join("token"), format!("{token}\n")).unwrap();
        }
        let mut session = Session::new(dir.path());
        session.load_token().unwrap();
        let session = SharedSession::new(session);

        let theme = Rc::new(Theme::default());
        let ctx = ViewContext {
            gateway: Arc::new(Gateway::new(Box::new(backend.clone()), session.clone())),
            theme: Rc::clone(&theme),
            api_url: "http://soq.test".into(),
        };
        let app = App::new(Views::new(&ctx), session.clone(), theme);
        let mut client = Client {
            app,
            runtime: Runtime::inline(),
            session,
            dir,
        };
        client.dispatch(Event::Resized {
            width: 80,
            height: 24,
        });
        let init = client.app.init();
        client.run(init);
        client
    }

    fn run(&mut self, command: Option<soq_tui::tui::command::Command>) {
        if let Some(command) = command {
            self.runtime.execute(command);
        }
        let app = &mut self.app;
        self.runtime.drain(|event| app.handle_event(event));
    }

    fn dispatch(&mut self, event: Event) {
        let command = self.app.handle_event(event);
        self.run(command);
    }

    fn press(&mut self, code: KeyCode) {
        self.dispatch(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn screen(&self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| self.app.render(frame)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content
            .chunks(buf.area.width as usize)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const TASKS: &str = r#"[{"id":1,"summary":"Write report","notes":"","status":"open","focusArea":{"id":1,"name":"Work"}}]"#;
const RESOLVED: &str = r#"[{"id":1,"summary":"Write report","notes":"","status":"closed","focusArea":{"id":1,"name":"Work"}}]"#;
const AREAS: &str = r#"[{"id":1,"name":"Work"},{"id":2,"name":"Home"}]"#;

#[test]
fn fresh_install_logs_in_and_lands_on_tasks() {
    let backend = Backend::default()
        .on("POST /auth/token", 200, r#"{"token":"abc"}"#)
        .on("GET /tasks", 200, TASKS);
    let mut client = Client::start(&backend, None);
    assert_eq!(client.app.state(), AppState::Login);
    assert!(client.screen().contains("Log in to soq"));

    client.type_text("alice");
    client.press(KeyCode::Tab);
    client.type_text("secret");
    client.press(KeyCode::Enter);

    assert_eq!(client.app.state(), AppState::TaskList);
    assert_eq!(
        std::fs::read_to_string(client.dir.path().join("token")).unwrap(),
        "abc"
    );
    assert_eq!(backend.calls(), vec!["POST /auth/token", "GET /tasks"]);
    assert_eq!(backend.requests()[1].bearer.as_deref(), Some("abc"));
    assert!(client.screen().contains("[ ] Write report"));
}

#[test]
fn saved_token_skips_login_and_resolve_refetches() {
    let backend = Backend::default()
        .on("GET /tasks", 200, TASKS)
        .on("GET /tasks", 200, RESOLVED)
        .on("PATCH /tasks/1/resolve", 200, r#"{"id":1,"summary":"Write report","status":"closed"}"#);
    let mut client = Client::start(&backend, Some("tok"));
    assert_eq!(client.app.state(), AppState::TaskList);

    client.press(KeyCode::Char('r'));
    assert_eq!(
        backend.calls(),
        vec!["GET /tasks", "PATCH /tasks/1/resolve", "GET /tasks"]
    );
    assert!(client.screen().contains("[x] Write report"));
}

#[test]
fn new_task_round_trip() {
    let backend = Backend::default()
        .on("GET /tasks", 200, "[]")
        .on("GET /tasks", 200, TASKS)
        .on("GET /focusareas", 200, AREAS)
        .on("POST /tasks", 201, r#"{"id":1,"summary":"Write report"}"#);
    let mut client = Client::start(&backend, Some("tok"));

    client.press(KeyCode::Char('n'));
    assert_eq!(client.app.state(), AppState::TaskForm);
    assert!(client.screen().contains("New Task"));

    client.type_text("Write report");
    client.press(KeyCode::Enter);
    assert_eq!(client.app.state(), AppState::TaskList);
    assert_eq!(
        backend.calls(),
        vec!["GET /tasks", "GET /focusareas", "POST /tasks", "GET /tasks"]
    );
    assert_eq!(
        backend.requests()[2].body,
        Some(serde_json::json!({"summary": "Write report", "notes": "", "focusAreaId": 1}))
    );
}

#[test]
fn unauthorized_fetch_signs_out_and_shows_error() {
    let backend = Backend::default().on("GET /tasks", 401, "");
    let mut client = Client::start(&backend, Some("stale"));

    assert!(!client.session.is_authenticated());
    assert!(!client.dir.path().join("token").exists());
    let screen = client.screen();
    assert!(screen.contains("Error: error fetching tasks: unauthorized"));

    client.press(KeyCode::Esc);
    assert!(client.app.error().is_none());
    assert!(client.screen().contains("My Tasks"));
}

#[test]
fn settings_log_out_returns_to_login() {
    let backend = Backend::default().on("GET /tasks", 200, "[]");
    let mut client = Client::start(&backend, Some("tok"));
    client.press(KeyCode::Char(','));
    assert_eq!(client.app.state(), AppState::Settings);
    assert!(client.screen().contains("http://soq.test"));

    client.press(KeyCode::Char('l'));
    assert_eq!(client.app.state(), AppState::Login);
    assert!(!client.session.is_authenticated());
}

#[test]
fn ctrl_c_says_goodbye() {
    let backend = Backend::default();
    let mut client = Client::start(&backend, None);
    client.dispatch(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(client.runtime.should_quit());
    assert!(client.screen().contains("Bye!"));
}
