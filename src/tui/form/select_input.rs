use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::event::{Event, SelectOption};
use crate::tui::keys;
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::FormField;

/// Pick one of a list of options; the list shows in the side panel while
/// focused and the box shows the current choice.
pub struct SelectInput {
    id: &'static str,
    label: &'static str,
    options: Vec<SelectOption>,
    selected: usize,
    focused: bool,
    width: u16,
    panel_rows: u16,
}

impl SelectInput {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        SelectInput {
            id,
            label,
            options: Vec::new(),
            selected: 0,
            focused: false,
            width: 0,
            panel_rows: 0,
        }
    }

    /// Replace the options, keeping the current choice when it is still offered
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        let current = self.value();
        self.options = options;
        self.selected = self
            .options
            .iter()
            .position(|o| o.value == current)
            .unwrap_or(0);
    }

    fn selected_option(&self) -> Option<&SelectOption> {
        self.options.get(self.selected)
    }

    /// First visible option index so `selected` stays on screen
    fn scroll_offset(&self) -> usize {
        let rows = self.panel_rows.max(1) as usize;
        (self.selected + 1).saturating_sub(rows)
    }
}

impl FormField for SelectInput {
    fn id(&self) -> &'static str {
        self.id
    }

    fn value(&self) -> String {
        self.selected_option()
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, value: &str) {
        if let Some(index) = self.options.iter().position(|o| o.value == value) {
            self.selected = index;
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if keys::is_up(key) {
            self.selected = self.selected.saturating_sub(1);
        } else if keys::is_down(key) && self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::SetSelectOptions { options, .. } = event {
            self.set_options(options.clone());
        }
    }

    fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        3
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let area = Rect {
            width: area.width.min(self.width),
            ..area
        };
        let border_color = if self.focused {
            theme.highlight
        } else {
            theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color).bg(theme.background))
            .title(Span::styled(
                format!(" {} ", self.label),
                Style::default().fg(theme.text).bg(theme.background),
            ))
            .style(Style::default().bg(theme.background));
        let inner_w = block.inner(area).width as usize;

        let line = match self.selected_option() {
            Some(option) => Span::styled(
                unicode::truncate_to_width(&option.label, inner_w),
                Style::default().fg(theme.text_bright).bg(theme.background),
            ),
            None => Span::styled(
                "(none)",
                Style::default().fg(theme.dim).bg(theme.background),
            ),
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn has_panel(&self) -> bool {
        true
    }

    fn set_panel_size(&mut self, _width: u16, height: u16) {
        self.panel_rows = height;
    }

    fn render_panel(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let width = area.width as usize;
        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .skip(self.scroll_offset())
            .take(area.height as usize)
            .map(|(i, option)| {
                let label = unicode::truncate_to_width(&option.label, width.saturating_sub(2));
                if i == self.selected {
                    let style = Style::default()
                        .fg(theme.text_bright)
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD);
                    let pad = width.saturating_sub(2 + unicode::display_width(&label));
                    Line::from(vec![
                        Span::styled("\u{25B8} ", style.fg(theme.highlight)),
                        Span::styled(label, style),
                        Span::styled(" ".repeat(pad), style),
                    ])
                } else {
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(label, Style::default().fg(theme.text)),
                    ])
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme.background)),
            area,
        );
    }
}
