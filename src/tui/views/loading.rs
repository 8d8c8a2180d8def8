use std::rc::Rc;
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::command::Command;
use crate::tui::event::Event;
use crate::tui::theme::Theme;

use super::{View, ViewContext};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner shown until the first navigation. Ticks only while active; each
/// focus/blur bumps the generation so ticks scheduled earlier are dropped.
pub struct LoadingView {
    theme: Rc<Theme>,
    active: bool,
    generation: u64,
    frame: usize,
}

impl LoadingView {
    pub fn new(ctx: &ViewContext) -> Self {
        LoadingView {
            theme: Rc::clone(&ctx.theme),
            active: false,
            generation: 0,
            frame: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) -> Option<Command> {
        self.active = true;
        self.generation += 1;
        Some(self.tick())
    }

    fn tick(&self) -> Command {
        Command::Tick {
            after: TICK_INTERVAL,
            event: Event::Tick(self.generation),
        }
    }
}

impl View for LoadingView {
    // The app starts on this screen without a navigation
    fn init(&mut self) -> Option<Command> {
        self.start()
    }

    fn handle_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Tick(generation) if self.active && *generation == self.generation => {
                self.frame = (self.frame + 1) % SPINNER.len();
                Some(self.tick())
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                SPINNER[self.frame],
                Style::default().fg(self.theme.highlight).bg(self.theme.background),
            ),
            Span::styled(
                " Loading...",
                Style::default().fg(self.theme.text).bg(self.theme.background),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn blur(&mut self) -> Option<Command> {
        self.active = false;
        self.generation += 1;
        None
    }

    fn focus(&mut self) -> Option<Command> {
        self.start()
    }
}
