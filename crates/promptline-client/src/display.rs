// Pure functions and a small cursor tracker producing ANSI output for a
// raw-mode terminal (lines end with \r\n).

use promptline_core::completion::HISTORY_CLASS_NAME;
use promptline_core::Suggestion;
use unicode_width::UnicodeWidthStr;

/// Redraws the prompt in place. Remembers which input row the terminal
/// cursor was left on so the next frame can move back to the first row.
pub struct Screen {
    prompt: String,
    caret_row: usize,
}

impl Screen {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            caret_row: 0,
        }
    }

    /// Clear the previous frame and draw `text` with the cursor at
    /// (`line`, `column`).
    pub fn render(&mut self, text: &str, line: usize, column: usize) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let line = line.min(lines.len() - 1);
        let mut out = self.to_first_row();
        out.push_str("\r\x1b[J");

        let prompt_width = self.prompt.width();
        for (i, l) in lines.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("\x1b[36m{}\x1b[0m", self.prompt));
            } else {
                out.push_str("\r\n");
                out.push_str(&render_continuation(prompt_width));
            }
            out.push_str(l);
        }

        let up = lines.len() - 1 - line;
        if up > 0 {
            out.push_str(&format!("\x1b[{}A", up));
        }
        let before: String = lines[line].chars().take(column).collect();
        let col = prompt_width + before.width();
        out.push('\r');
        if col > 0 {
            out.push_str(&format!("\x1b[{}C", col));
        }
        self.caret_row = line;
        out
    }

    /// Leave the current frame: move below its last row and start a new
    /// line. The next `render` starts a fresh frame there.
    pub fn finish(&mut self, text: &str) -> String {
        let rows = text.split('\n').count();
        let down = rows - 1 - self.caret_row.min(rows - 1);
        let mut out = String::new();
        if down > 0 {
            out.push_str(&format!("\x1b[{}B", down));
        }
        out.push_str("\r\n");
        self.caret_row = 0;
        out
    }

    fn to_first_row(&self) -> String {
        if self.caret_row > 0 {
            format!("\x1b[{}A", self.caret_row)
        } else {
            String::new()
        }
    }
}

/// Dim leader for continuation lines, as wide as the prompt.
fn render_continuation(width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("\x1b[2m{:>width$}\x1b[0m", "· ", width = width)
}

/// Suggestion list, one per line; history entries in dim text.
pub fn render_suggestions(suggestions: &[Suggestion]) -> String {
    let mut out = String::new();
    for s in suggestions {
        if s.class_name.as_deref() == Some(HISTORY_CLASS_NAME) {
            out.push_str(&format!("\x1b[2m{}\x1b[0m\r\n", s.title));
        } else {
            out.push_str(&format!("{}\r\n", s.title));
        }
    }
    out
}

pub fn render_bell() -> String {
    "\x07".to_string()
}
