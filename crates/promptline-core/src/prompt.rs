use promptline_common::config::{Platform, PromptConfig};
use std::future::Future;
use std::sync::Arc;

use crate::completion::{self, CompletionSource, Suggestion};
use crate::editor::{Editor, EditorFactory, EditorOptions, TextRange, Widget};
use crate::history::HistoryManager;
use crate::keys::{self, CaretLines, HistoryStep, KeyEvent};

/// Command prompt: history navigation and autocomplete on top of an editor.
///
/// Text set before an editor is attached is buffered and moved into the
/// editor on [`attach_editor`](Self::attach_editor). Until then every caret
/// predicate answers false.
pub struct PromptController {
    host: Box<dyn Widget>,
    editor: Option<Box<dyn Editor>>,
    initial_text: String,
    history: HistoryManager,
    source: Arc<dyn CompletionSource>,
    platform: Platform,
    mime_type: String,
    add_completions_from_history: bool,
    max_history_suggestions: usize,
}

impl PromptController {
    pub fn new(host: Box<dyn Widget>, source: Arc<dyn CompletionSource>, config: &PromptConfig) -> Self {
        Self {
            host,
            editor: None,
            initial_text: String::new(),
            history: HistoryManager::new(),
            source,
            platform: config.prompt.keymap.platform(),
            mime_type: config.prompt.language.clone(),
            add_completions_from_history: config.prompt.history_completions,
            max_history_suggestions: config.prompt.max_history_suggestions,
        }
    }

    /// Create the backing editor and hand it the buffered text.
    pub fn attach_editor(&mut self, factory: &dyn EditorFactory) {
        let mut editor = factory.create_editor(&EditorOptions::prompt(&self.mime_type));
        editor.set_text(&std::mem::take(&mut self.initial_text));
        if self.host.has_focus() {
            editor.focus();
        }
        tracing::debug!("prompt editor attached ({})", self.mime_type);
        self.editor = Some(editor);
    }

    pub fn editor(&self) -> Option<&(dyn Editor + 'static)> {
        self.editor.as_deref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut (dyn Editor + 'static)> {
        self.editor.as_deref_mut()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager {
        &mut self.history
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn clear_autocomplete(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.clear_autocomplete();
        }
    }

    pub fn focus(&mut self) {
        match self.editor.as_mut() {
            Some(editor) => editor.focus(),
            None => self.host.focus(),
        }
    }

    pub fn is_caret_inside_prompt(&self) -> bool {
        self.host.has_focus()
    }

    /// Compares collapsed end positions only; a selection that ends at the
    /// end of the text counts.
    pub fn is_caret_at_end_of_prompt(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|e| e.selection().collapse_to_end() == e.full_range().collapse_to_end())
    }

    pub fn is_caret_on_last_line(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|e| e.selection().end_line == e.full_range().end_line)
    }

    pub fn is_caret_on_first_line(&self) -> bool {
        self.editor.as_ref().is_some_and(|e| e.selection().end_line == 0)
    }

    pub fn move_caret_to_end_of_prompt(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_selection(TextRange::from_location(usize::MAX, usize::MAX));
        }
    }

    pub fn move_caret_to_end_of_first_line(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_selection(TextRange::from_location(0, usize::MAX));
        }
    }

    pub fn set_text(&mut self, text: &str) {
        match self.editor.as_mut() {
            Some(editor) => editor.set_text(text),
            None => self.initial_text = text.to_string(),
        }
    }

    pub fn text(&self) -> String {
        match self.editor.as_ref() {
            Some(editor) => editor.text(),
            None => self.initial_text.clone(),
        }
    }

    pub fn newline_and_indent(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.newline_and_indent();
        }
    }

    pub fn set_add_completions_from_history(&mut self, value: bool) {
        self.add_completions_from_history = value;
    }

    /// Handle a key-down. Returns true when the key navigated history and
    /// must not reach the editor.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> bool {
        let caret = CaretLines {
            on_first_line: self.is_caret_on_first_line(),
            on_last_line: self.is_caret_on_last_line(),
        };
        let Some(step) = keys::history_step(event, caret, self.platform) else {
            return false;
        };

        let new_text = match step {
            HistoryStep::Previous => {
                let current = self.text();
                self.history.previous(&current)
            }
            HistoryStep::Next => self.history.next(),
        };
        // Exhausted at this edge: leave the key to the editor.
        let Some(new_text) = new_text else {
            return false;
        };

        tracing::debug!("history {:?}", step);
        self.set_text(&new_text);
        match step {
            HistoryStep::Previous => self.move_caret_to_end_of_first_line(),
            HistoryStep::Next => self.move_caret_to_end_of_prompt(),
        }
        true
    }

    /// Token range that a suggestion accepted at (`line`, `column`) replaces.
    pub fn substitute_range(&self, line: usize, column: usize) -> Option<TextRange> {
        let editor = self.editor.as_ref()?;
        Some(completion::substitute_range(&editor.line(line), line, column))
    }

    /// History entries extending the current text, or nothing when history
    /// completions are off or the caret is not at the end.
    pub fn history_completions(&self, prefix: &str) -> Vec<Suggestion> {
        if !self.add_completions_from_history || !self.is_caret_at_end_of_prompt() {
            return Vec::new();
        }
        completion::history_suggestions(
            self.history.history_data(),
            &self.text(),
            prefix,
            self.max_history_suggestions,
        )
    }

    /// Suggestions for the token in `prefix_range`: runtime completions
    /// followed by history matches.
    ///
    /// Everything but the completion source query is captured now, so the
    /// result reflects the prompt as it was when this was called.
    pub fn words_with_prefix(
        &self,
        prefix_range: TextRange,
        _substitute_range: TextRange,
    ) -> impl Future<Output = Vec<Suggestion>> + Send + 'static {
        let request = self.editor.as_ref().map(|editor| {
            let prefix = editor.text_in_range(&prefix_range);
            let before = editor.text_in_range(&TextRange::new(
                0,
                0,
                prefix_range.start_line,
                prefix_range.start_column,
            ));
            let history_words = self.history_completions(&prefix);
            (before, prefix, history_words)
        });
        let source = Arc::clone(&self.source);

        async move {
            let Some((before, prefix, history_words)) = request else {
                return Vec::new();
            };
            let words = match source.completions_for_text(&before, &prefix, false).await {
                Ok(words) => words,
                Err(e) => {
                    tracing::warn!("completion source failed: {}", e);
                    Vec::new()
                }
            };
            tracing::debug!(
                "completions for {:?}: {} runtime, {} history",
                prefix,
                words.len(),
                history_words.len()
            );
            completion::merge_suggestions(words, history_words)
        }
    }
}
