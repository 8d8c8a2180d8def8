use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders};

use crate::tui::theme::Theme;

use super::FormField;

/// Columns the side panel takes from the form, border included
pub const PANEL_WIDTH: u16 = 20;

/// Rounded box to the right of a form, filled by the focused field
#[derive(Debug, Default)]
pub struct SidePanel {
    open: bool,
    width: u16,
    height: u16,
}

impl SidePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Space left for content inside the border
    pub fn inner_size(&self) -> (u16, u16) {
        (self.width.saturating_sub(2), self.height.saturating_sub(2))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, field: &dyn FormField) {
        if !self.open {
            return;
        }
        let area = Rect {
            width: area.width.min(self.width),
            height: area.height.min(self.height),
            ..area
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border).bg(theme.background))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        field.render_panel(frame, inner, theme);
    }
}
