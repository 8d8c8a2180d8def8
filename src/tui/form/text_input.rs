use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::theme::Theme;
use crate::util::unicode;

use super::FormField;

/// Bordered single-line text field
pub struct TextInput {
    id: &'static str,
    label: &'static str,
    value: String,
    /// Byte offset into `value`, always on a grapheme boundary
    cursor: usize,
    hidden: bool,
    focused: bool,
    width: u16,
}

impl TextInput {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        TextInput {
            id,
            label,
            value: String::new(),
            cursor: 0,
            hidden: false,
            focused: false,
            width: 0,
        }
    }

    /// Echo `*` instead of the typed characters
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        // The inserted char can merge with a following combining mark
        let on_boundary = self.cursor == self.value.len()
            || self
                .value
                .grapheme_indices(true)
                .any(|(i, _)| i == self.cursor);
        if !on_boundary {
            self.cursor = unicode::next_grapheme_boundary(&self.value, self.cursor)
                .unwrap_or(self.value.len());
        }
    }

    fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(self.cursor..next, "");
        }
    }

    /// Text as displayed plus the cursor's byte offset in it
    fn display(&self) -> (String, usize) {
        if self.hidden {
            let before = self.value[..self.cursor].graphemes(true).count();
            let total = self.value.graphemes(true).count();
            ("*".repeat(total), before)
        } else {
            (self.value.clone(), self.cursor)
        }
    }
}

impl FormField for TextInput {
    fn id(&self) -> &'static str {
        self.id
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.value.len(),
            KeyCode::Char('u') if ctrl => {
                self.value.replace_range(..self.cursor, "");
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert(c)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => {}
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
        let inner = block.inner(area);

        let (text, cursor) = self.display();
        // Scroll horizontally so the cursor cell stays visible
        let visible_w = (inner.width as usize).saturating_sub(1);
        let start = unicode::tail_start_for_width(&text[..cursor], visible_w);
        let shown = &text[start..];

        let style = Style::default().fg(theme.text_bright).bg(theme.background);
        frame.render_widget(Paragraph::new(Span::styled(shown, style)).block(block), area);

        if self.focused && inner.width > 0 && inner.height > 0 {
            let x = inner.x + unicode::display_width(&text[start..cursor]) as u16;
            frame.set_cursor_position(Position::new(x.min(inner.x + inner.width - 1), inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(input: &mut TextInput, code: KeyCode) {
        input.handle_key(&KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = TextInput::new("name", "Name");
        type_str(&mut input, "helo");
        press(&mut input, KeyCode::Left);
        type_str(&mut input, "l");
        assert_eq!(input.value(), "hello");
        press(&mut input, KeyCode::End);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "hell");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "ell");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn editing_moves_by_grapheme() {
        let mut input = TextInput::new("name", "Name");
        input.set_value("cafe\u{301}!");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        // Cursor sits before the accented e, not between e and its accent
        assert_eq!(input.cursor(), 3);
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "caf!");
    }

    #[test]
    fn combining_mark_keeps_cursor_on_boundary() {
        let mut input = TextInput::new("name", "Name");
        type_str(&mut input, "e\u{301}");
        assert_eq!(input.cursor(), input.value().len());
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn ctrl_u_clears_before_cursor() {
        let mut input = TextInput::new("name", "Name");
        input.set_value("hello world");
        for _ in 0..5 {
            press(&mut input, KeyCode::Left);
        }
        input.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.value(), "world");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn hidden_display_masks_graphemes() {
        let mut input = TextInput::new("password", "Password").hidden();
        input.set_value("p\u{e9}w");
        let (text, cursor) = input.display();
        assert_eq!(text, "***");
        assert_eq!(cursor, 3);
        assert_eq!(input.value(), "p\u{e9}w");
    }
}
