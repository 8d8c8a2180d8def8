use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key plus the label shown for it in help bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub key: &'static str,
    pub help: &'static str,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, key: &'static str, help: &'static str) -> Self {
        KeyBinding {
            code,
            modifiers: KeyModifiers::NONE,
            key,
            help,
        }
    }

    pub const fn ctrl(c: char, key: &'static str, help: &'static str) -> Self {
        KeyBinding {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            key,
            help,
        }
    }

    /// Match ignoring SHIFT on character keys and BackTab (terminals disagree on it)
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mods = if matches!(event.code, KeyCode::Char(_) | KeyCode::BackTab) {
            event.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            event.modifiers
        };
        event.code == self.code && mods == self.modifiers
    }
}

/// Global quit, checked before any view sees the key
pub const QUIT: KeyBinding = KeyBinding::ctrl('c', "ctrl+c", "quit");
pub const BACK: KeyBinding = KeyBinding::new(KeyCode::Esc, "esc", "back");
pub const DISMISS: KeyBinding = KeyBinding::new(KeyCode::Esc, "esc", "dismiss");
pub const NEXT_FIELD: KeyBinding = KeyBinding::new(KeyCode::Tab, "tab", "next field");
pub const PREV_FIELD: KeyBinding = KeyBinding::new(KeyCode::BackTab, "shift+tab", "prev field");
pub const SUBMIT: KeyBinding = KeyBinding::new(KeyCode::Enter, "enter", "submit");
pub const NEW: KeyBinding = KeyBinding::new(KeyCode::Char('n'), "n", "new");
pub const EDIT: KeyBinding = KeyBinding::new(KeyCode::Char('e'), "e", "edit");
pub const DELETE: KeyBinding = KeyBinding::new(KeyCode::Char('d'), "d", "delete");
pub const RESOLVE: KeyBinding = KeyBinding::new(KeyCode::Char('r'), "r", "resolve");
pub const SETTINGS: KeyBinding = KeyBinding::new(KeyCode::Char(','), ",", "settings");
pub const FOCUS_AREAS: KeyBinding = KeyBinding::new(KeyCode::Char('f'), "f", "focus areas");
pub const LOGOUT: KeyBinding = KeyBinding::new(KeyCode::Char('l'), "l", "log out");
pub const UP: KeyBinding = KeyBinding::new(KeyCode::Up, "\u{2191}/k", "up");
pub const DOWN: KeyBinding = KeyBinding::new(KeyCode::Down, "\u{2193}/j", "down");

/// Up arrow or `k`
pub fn is_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
        && !key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Down arrow or `j`
pub fn is_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
        && !key.modifiers.contains(KeyModifiers::CONTROL)
}
