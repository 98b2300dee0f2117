// Default key handling for keys the prompt controller did not consume.

use promptline_core::{Editor, KeyCode, KeyEvent, Suggestion, TextRange};

#[derive(Debug, PartialEq)]
pub enum EditOutcome {
    Changed,
    Submit,
    Complete,
    /// Ctrl+C: drop the current input.
    Cancel,
    /// Ctrl+D on an empty prompt.
    Eof,
    Ignored,
}

pub fn apply_key(editor: &mut dyn Editor, event: &KeyEvent) -> EditOutcome {
    let (line, column) = caret(editor);
    match event.key_code {
        KeyCode::Enter if event.alt => {
            editor.newline_and_indent();
            EditOutcome::Changed
        }
        KeyCode::Enter => EditOutcome::Submit,
        KeyCode::Tab => EditOutcome::Complete,
        KeyCode::Escape => {
            editor.clear_autocomplete();
            EditOutcome::Ignored
        }
        KeyCode::Char(c) if event.ctrl => match c {
            'c' => EditOutcome::Cancel,
            'd' if editor.text().is_empty() => EditOutcome::Eof,
            'd' => delete_forward(editor),
            'a' => move_to(editor, line, 0),
            'e' => move_to(editor, line, usize::MAX),
            'u' => {
                let start = TextRange::new(line, 0, line, column);
                editor.replace_range(&start, "");
                EditOutcome::Changed
            }
            _ => EditOutcome::Ignored,
        },
        KeyCode::Char(_) if event.alt || event.meta => EditOutcome::Ignored,
        KeyCode::Char(c) => {
            let selection = editor.selection();
            editor.replace_range(&selection, c.encode_utf8(&mut [0; 4]));
            EditOutcome::Changed
        }
        KeyCode::Backspace => delete_backward(editor),
        KeyCode::Delete => delete_forward(editor),
        KeyCode::Left if column > 0 => move_to(editor, line, column - 1),
        KeyCode::Left if line > 0 => move_to(editor, line - 1, usize::MAX),
        KeyCode::Right if column < line_len(editor, line) => move_to(editor, line, column + 1),
        KeyCode::Right if line < last_line(editor) => move_to(editor, line + 1, 0),
        KeyCode::Home => move_to(editor, line, 0),
        KeyCode::End => move_to(editor, line, usize::MAX),
        KeyCode::Up if line > 0 => move_to(editor, line - 1, column),
        KeyCode::Down if line < last_line(editor) => move_to(editor, line + 1, column),
        _ => EditOutcome::Ignored,
    }
}

/// Replace `range` with the accepted suggestion.
pub fn accept_suggestion(editor: &mut dyn Editor, range: &TextRange, suggestion: &Suggestion) {
    editor.replace_range(range, &suggestion.title);
}

/// Longest prefix shared by every title, in whole chars.
pub fn common_prefix(suggestions: &[Suggestion]) -> String {
    let Some(first) = suggestions.first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.title.chars().collect();
    for s in &suggestions[1..] {
        let shared = prefix
            .iter()
            .zip(s.title.chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}

fn caret(editor: &dyn Editor) -> (usize, usize) {
    let selection = editor.selection();
    (selection.end_line, selection.end_column)
}

fn line_len(editor: &dyn Editor, line: usize) -> usize {
    editor.line(line).chars().count()
}

fn last_line(editor: &dyn Editor) -> usize {
    editor.full_range().end_line
}

fn move_to(editor: &mut dyn Editor, line: usize, column: usize) -> EditOutcome {
    editor.set_selection(TextRange::from_location(line, column));
    EditOutcome::Changed
}

fn delete_backward(editor: &mut dyn Editor) -> EditOutcome {
    let selection = editor.selection();
    let (line, column) = caret(editor);
    let range = if !selection.is_empty() {
        selection
    } else if column > 0 {
        TextRange::new(line, column - 1, line, column)
    } else if line > 0 {
        TextRange::new(line - 1, line_len(editor, line - 1), line, 0)
    } else {
        return EditOutcome::Ignored;
    };
    editor.replace_range(&range, "");
    EditOutcome::Changed
}

fn delete_forward(editor: &mut dyn Editor) -> EditOutcome {
    let selection = editor.selection();
    let (line, column) = caret(editor);
    let range = if !selection.is_empty() {
        selection
    } else if column < line_len(editor, line) {
        TextRange::new(line, column, line, column + 1)
    } else if line < last_line(editor) {
        TextRange::new(line, column, line + 1, 0)
    } else {
        return EditOutcome::Ignored;
    };
    editor.replace_range(&range, "");
    EditOutcome::Changed
}
