use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self as term, Event as TermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, error, info, warn};

use crate::api::{Gateway, ReqwestTransport};
use crate::io::session::{Session, SharedSession};
use crate::model::Config;

use super::command::{Command, Runtime};
use super::event::{AppError, AppState, Event};
use super::keys;
use super::render;
use super::theme::Theme;
use super::views::{ViewContext, ViewRegistry, Views};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Routes events to views and owns the cross-screen state: which screen is
/// active, the displayed error, and whether the program is shutting down.
pub struct App<R: ViewRegistry = Views> {
    views: R,
    state: AppState,
    session: SharedSession,
    theme: Rc<Theme>,
    error: Option<AppError>,
    quitting: bool,
}

impl<R: ViewRegistry> App<R> {
    pub fn new(views: R, session: SharedSession, theme: Rc<Theme>) -> Self {
        App {
            views,
            state: AppState::Loading,
            session,
            theme,
            error: None,
            quitting: false,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Every view's startup work, then the first real screen
    pub fn init(&mut self) -> Option<Command> {
        let inits: Vec<Option<Command>> = AppState::ALL
            .iter()
            .map(|state| self.views.get_mut(*state).init())
            .collect();
        let first = if self.session.is_authenticated() {
            AppState::TaskList
        } else {
            AppState::Login
        };
        info!(first = first.name(), "starting");
        Command::sequence([
            Command::batch(inits),
            Some(Command::emit(Event::Navigate(first))),
        ])
    }

    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        debug!(kind = event.kind(), state = self.state.name(), "event");
        match event {
            Event::Quit => {
                self.quitting = true;
                Some(Command::Quit)
            }
            Event::Error(err) => {
                warn!(error = %err, "error displayed");
                self.error = Some(err);
                None
            }
            Event::Authenticated(token) => match self.session.set_token(&token) {
                Ok(()) => {
                    self.error = None;
                    Some(Command::emit(Event::Navigate(AppState::TaskList)))
                }
                Err(e) => {
                    error!(error = %e, "failed to save token");
                    Some(Command::emit(Event::Error(e.into())))
                }
            },
            Event::Logout => match self.session.clear_token() {
                Ok(()) => Some(Command::emit(Event::Navigate(AppState::Login))),
                Err(e) => {
                    error!(error = %e, "failed to clear token");
                    Some(Command::emit(Event::Error(e.into())))
                }
            },
            Event::Resized { width, height } => {
                let (frame_w, frame_h) = self.theme.frame_size();
                self.broadcast(&Event::Resized {
                    width: width.saturating_sub(frame_w),
                    height: height.saturating_sub(frame_h),
                })
            }
            Event::Key(key) => {
                if keys::QUIT.matches(&key) {
                    return self.handle_event(Event::Quit);
                }
                if self.error.is_some() && keys::DISMISS.matches(&key) {
                    self.error = None;
                    return None;
                }
                self.views
                    .get_mut(self.state)
                    .handle_event(&Event::Key(key))
            }
            Event::Navigate(next) => self.navigate(next),
            other => self.broadcast(&other),
        }
    }

    fn navigate(&mut self, next: AppState) -> Option<Command> {
        info!(from = self.state.name(), to = next.name(), "navigate");
        let blur = self.views.get_mut(self.state).blur();
        self.state = next;
        let focus = self.views.get_mut(next).focus();
        self.error = None;
        Command::sequence([blur, focus])
    }

    fn broadcast(&mut self, event: &Event) -> Option<Command> {
        let commands: Vec<Option<Command>> = AppState::ALL
            .iter()
            .map(|state| self.views.get_mut(*state).handle_event(event))
            .collect();
        Command::batch(commands)
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = render::page(frame, frame.area(), &self.theme);
        if self.quitting {
            render::render_goodbye(frame, area, &self.theme);
        } else if let Some(err) = &self.error {
            render::render_error(frame, area, &self.theme, err);
        } else {
            self.views.get(self.state).render(frame, area);
        }
    }
}

/// Run the TUI application
pub fn run(config_dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(config_dir);
    if let Err(e) = session.load_token() {
        warn!(error = %e, "could not read saved token, starting signed out");
    }
    let session = SharedSession::new(session);

    let transport = ReqwestTransport::new(&config.api_url, config.request_timeout())?;
    let theme = Rc::new(Theme::from_config(&config.ui));
    let ctx = ViewContext {
        gateway: Arc::new(Gateway::new(Box::new(transport), session.clone())),
        theme: Rc::clone(&theme),
        api_url: config.api_url.clone(),
    };
    let mut app = App::new(Views::new(&ctx), session, theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Worker panics are caught and reported by the runtime
        if std::thread::current().name() != Some("main") {
            return;
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut runtime = Runtime::threaded();

    let size = terminal.size()?;
    let startup = [
        app.handle_event(Event::Resized {
            width: size.width,
            height: size.height,
        }),
        app.init(),
    ];
    for command in startup.into_iter().flatten() {
        runtime.execute(command);
    }

    loop {
        terminal.draw(|frame| app.render(frame))?;
        if runtime.should_quit() {
            break;
        }

        if term::poll(POLL_INTERVAL)? {
            let command = match term::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_event(Event::Key(key))
                }
                TermEvent::Resize(width, height) => {
                    app.handle_event(Event::Resized { width, height })
                }
                _ => None,
            };
            if let Some(command) = command {
                runtime.execute(command);
            }
        }

        runtime.drain(|event| app.handle_event(event));
    }
    info!("exiting");
    Ok(())
}
