use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;
use crate::util::unicode;

/// First visible row so that `cursor` stays inside `rows` lines
pub fn scroll_offset(cursor: usize, rows: usize) -> usize {
    (cursor + 1).saturating_sub(rows.max(1))
}

/// Render one row per label, highlighting the row under the cursor.
/// `empty` is shown instead when there are no rows.
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    labels: &[String],
    cursor: usize,
    empty: &str,
) {
    let bg_style = Style::default().bg(theme.background);
    if labels.is_empty() {
        let style = Style::default().fg(theme.dim).bg(theme.background);
        frame.render_widget(Paragraph::new(Span::styled(empty.to_string(), style)), area);
        return;
    }

    let width = area.width as usize;
    let rows = area.height as usize;
    let offset = scroll_offset(cursor, rows);
    let lines: Vec<Line> = labels
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, label)| {
            let text = unicode::truncate_to_width(label, width.saturating_sub(2));
            if i == cursor {
                let style = Style::default()
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD);
                let used = 2 + unicode::display_width(&text);
                Line::from(vec![
                    Span::styled("\u{25B8} ", style.fg(theme.highlight)),
                    Span::styled(text, style),
                    Span::styled(" ".repeat(width.saturating_sub(used)), style),
                ])
            } else {
                Line::from(vec![
                    Span::styled("  ", bg_style),
                    Span::styled(text, Style::default().fg(theme.text).bg(theme.background)),
                ])
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).style(bg_style), area);
}
