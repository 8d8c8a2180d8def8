pub mod help_bar;
pub mod list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use super::event::AppError;
use super::keys;
use super::theme::Theme;

/// Rows a screen title takes, blank spacer included
pub const TITLE_HEIGHT: u16 = 2;

/// Fill `area` with the background and return the content area inside the
/// page frame
pub fn page(frame: &mut Frame, area: Rect, theme: &Theme) -> Rect {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );
    let (w, h) = theme.frame_size();
    Rect {
        x: area.x + theme.frame_horizontal.min(area.width),
        y: area.y + theme.frame_vertical.min(area.height),
        width: area.width.saturating_sub(w),
        height: area.height.saturating_sub(h),
    }
}

/// Split off the title rows; returns (title, body)
pub fn split_title(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TITLE_HEIGHT), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split off the bottom help line; returns (body, help)
pub fn split_help(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_title(frame: &mut Frame, area: Rect, theme: &Theme, title: &str) {
    let style = Style::default()
        .fg(theme.highlight)
        .bg(theme.background)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(title.to_string(), style))),
        area,
    );
}

pub fn render_goodbye(frame: &mut Frame, area: Rect, theme: &Theme) {
    let style = Style::default().fg(theme.text_bright).bg(theme.background);
    frame.render_widget(Paragraph::new(Span::styled("Bye!", style)), area);
}

/// Error banner with the dismiss hint on the bottom line
pub fn render_error(frame: &mut Frame, area: Rect, theme: &Theme, error: &AppError) {
    let (body, help) = split_help(area);
    let style = Style::default().fg(theme.red).bg(theme.background);
    let paragraph = Paragraph::new(Span::styled(format!("Error: {error}"), style))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, body);
    help_bar::render_help_bar(frame, help, theme, &[keys::DISMISS, keys::QUIT]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::render_to_string;

    #[test]
    fn page_insets_by_frame() {
        let theme = Theme::default();
        let mut inner = Rect::default();
        render_to_string(40, 10, |frame, area| inner = page(frame, area, &theme));
        assert_eq!(inner, Rect::new(2, 1, 36, 8));
    }

    #[test]
    fn error_banner_shows_message_and_hint() {
        let theme = Theme::default();
        let err = AppError::invalid("no task selected");
        let out = render_to_string(40, 5, |frame, area| render_error(frame, area, &theme, &err));
        assert!(out.starts_with("Error: no task selected"));
        assert!(out.ends_with("esc dismiss  ctrl+c quit"));
    }
}
