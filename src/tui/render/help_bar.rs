use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::keys::KeyBinding;
use crate::tui::theme::Theme;

/// One line of `key description` pairs separated by two spaces
pub fn help_line(theme: &Theme, bindings: &[KeyBinding]) -> Line<'static> {
    let key_style = Style::default().fg(theme.text_bright).bg(theme.background);
    let help_style = Style::default().fg(theme.dim).bg(theme.background);
    let mut spans = Vec::with_capacity(bindings.len() * 3);
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", help_style));
        }
        spans.push(Span::styled(binding.key, key_style));
        spans.push(Span::styled(format!(" {}", binding.help), help_style));
    }
    Line::from(spans)
}

pub fn render_help_bar(frame: &mut Frame, area: Rect, theme: &Theme, bindings: &[KeyBinding]) {
    let paragraph =
        Paragraph::new(help_line(theme, bindings)).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}
