use promptline_common::config::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Char(char),
}

/// A physical key-down with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode) -> Self {
        Self {
            key_code,
            ctrl: false,
            meta: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(key_code: KeyCode) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key_code)
        }
    }

    pub fn alt(key_code: KeyCode) -> Self {
        Self {
            alt: true,
            ..Self::new(key_code)
        }
    }

    /// Ctrl held alone, no Meta/Alt/Shift.
    fn is_plain_ctrl(&self) -> bool {
        self.ctrl && !self.meta && !self.alt && !self.shift
    }

    fn is_char(&self, c: char) -> bool {
        matches!(self.key_code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Previous,
    Next,
}

/// Where the caret sits relative to the prompt's lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaretLines {
    pub on_first_line: bool,
    pub on_last_line: bool,
}

/// Decide whether a key-down navigates history.
///
/// Arrow keys only navigate from the edge line they point past; Ctrl+P and
/// Ctrl+N ignore the caret line but exist only on the Mac keymap.
pub fn history_step(event: &KeyEvent, caret: CaretLines, platform: Platform) -> Option<HistoryStep> {
    match event.key_code {
        KeyCode::Up if caret.on_first_line => Some(HistoryStep::Previous),
        KeyCode::Down if caret.on_last_line => Some(HistoryStep::Next),
        _ if platform == Platform::Mac && event.is_plain_ctrl() => {
            if event.is_char('p') {
                Some(HistoryStep::Previous)
            } else if event.is_char('n') {
                Some(HistoryStep::Next)
            } else {
                None
            }
        }
        _ => None,
    }
}
