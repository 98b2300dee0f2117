/// Half-open span between two (line, column) positions. Columns count chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl TextRange {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Collapsed range at a single position. `usize::MAX` stands for "past the
    /// end" and is clamped by the editor.
    pub fn from_location(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    pub fn collapse_to_end(&self) -> Self {
        Self::from_location(self.end_line, self.end_column)
    }

    pub fn collapse_to_start(&self) -> Self {
        Self::from_location(self.start_line, self.start_column)
    }

    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_column == self.end_column
    }

    /// Same span with start before end.
    pub fn normalize(&self) -> Self {
        if (self.start_line, self.start_column) <= (self.end_line, self.end_column) {
            *self
        } else {
            Self::new(self.end_line, self.end_column, self.start_line, self.start_column)
        }
    }
}

/// Options handed to an [`EditorFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub line_numbers: bool,
    pub line_wrapping: bool,
    pub mime_type: String,
    pub auto_height: bool,
}

impl EditorOptions {
    /// Options for a prompt: no gutter, wrapped lines, grows with its content.
    pub fn prompt(mime_type: &str) -> Self {
        Self {
            line_numbers: false,
            line_wrapping: true,
            mime_type: mime_type.to_string(),
            auto_height: true,
        }
    }
}

/// The text widget backing a prompt. Everything the prompt knows about caret
/// placement is derived from `selection` and `full_range`.
pub trait Editor {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn text_in_range(&self, range: &TextRange) -> String;
    /// Text of one line, empty when out of range.
    fn line(&self, line: usize) -> String;
    fn selection(&self) -> TextRange;
    fn set_selection(&mut self, range: TextRange);
    fn full_range(&self) -> TextRange;
    /// Replace `range` with `text`; returns the span of the inserted text.
    fn replace_range(&mut self, range: &TextRange, text: &str) -> TextRange;
    fn newline_and_indent(&mut self);
    /// Dismiss any open suggestion popup.
    fn clear_autocomplete(&mut self) {}
    fn focus(&mut self) {}
}

pub trait EditorFactory {
    fn create_editor(&self, options: &EditorOptions) -> Box<dyn Editor>;
}

/// Focus-capable element hosting the prompt.
pub trait Widget {
    fn has_focus(&self) -> bool;
    fn focus(&mut self);
}

// ---------------------------------------------------------------------------
// In-memory editor
// ---------------------------------------------------------------------------

/// Plain line buffer with a single selection.
#[derive(Debug)]
pub struct BufferEditor {
    lines: Vec<String>,
    selection: TextRange,
    options: EditorOptions,
    focused: bool,
}

impl BufferEditor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            lines: vec![String::new()],
            selection: TextRange::default(),
            options,
            focused: false,
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    fn clamp(&self, line: usize, column: usize) -> (usize, usize) {
        let line = line.min(self.lines.len() - 1);
        (line, column.min(self.line_len(line)))
    }

    /// Clamps first: two positions past the last line can land on it in
    /// reverse column order.
    fn clamp_range(&self, range: &TextRange) -> TextRange {
        let (sl, sc) = self.clamp(range.start_line, range.start_column);
        let (el, ec) = self.clamp(range.end_line, range.end_column);
        TextRange::new(sl, sc, el, ec).normalize()
    }

    /// Char offset of a clamped position into `text()`.
    fn offset(&self, line: usize, column: usize) -> usize {
        self.lines[..line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum::<usize>()
            + column
    }

    fn position(&self, mut offset: usize) -> (usize, usize) {
        for (i, l) in self.lines.iter().enumerate() {
            let len = l.chars().count();
            if offset <= len {
                return (i, offset);
            }
            offset -= len + 1;
        }
        let last = self.lines.len() - 1;
        (last, self.line_len(last))
    }
}

impl Editor for BufferEditor {
    fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the whole buffer and puts the caret at the start.
    fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.selection = TextRange::default();
    }

    fn text_in_range(&self, range: &TextRange) -> String {
        let range = self.clamp_range(range);
        let start = self.offset(range.start_line, range.start_column);
        let end = self.offset(range.end_line, range.end_column);
        self.text().chars().skip(start).take(end - start).collect()
    }

    fn line(&self, line: usize) -> String {
        self.lines.get(line).cloned().unwrap_or_default()
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn set_selection(&mut self, range: TextRange) {
        let (sl, sc) = self.clamp(range.start_line, range.start_column);
        let (el, ec) = self.clamp(range.end_line, range.end_column);
        self.selection = TextRange::new(sl, sc, el, ec);
    }

    fn full_range(&self) -> TextRange {
        let last = self.lines.len() - 1;
        TextRange::new(0, 0, last, self.line_len(last))
    }

    /// The caret ends up collapsed after the inserted text.
    fn replace_range(&mut self, range: &TextRange, text: &str) -> TextRange {
        let range = self.clamp_range(range);
        let start = self.offset(range.start_line, range.start_column);
        let end = self.offset(range.end_line, range.end_column);

        let current: Vec<char> = self.text().chars().collect();
        let mut updated: String = current[..start].iter().collect();
        updated.push_str(text);
        updated.extend(&current[end..]);
        self.lines = updated.split('\n').map(str::to_string).collect();

        let (sl, sc) = self.position(start);
        let (el, ec) = self.position(start + text.chars().count());
        self.selection = TextRange::from_location(el, ec);
        TextRange::new(sl, sc, el, ec)
    }

    fn newline_and_indent(&mut self) {
        let caret = self.selection.normalize();
        let indent: String = self.lines[caret.start_line]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.replace_range(&caret, &format!("\n{}", indent));
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[derive(Debug, Default)]
pub struct BufferEditorFactory;

impl EditorFactory for BufferEditorFactory {
    fn create_editor(&self, options: &EditorOptions) -> Box<dyn Editor> {
        Box::new(BufferEditor::new(options.clone()))
    }
}
