use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;

use crate::editor::TextRange;

/// Characters that start a new token for completion purposes.
const BOUNDARY_CHARS: &str = " =:[({;,!+-*/&|^<>.";

/// Class name attached to history-derived suggestions so the popup can
/// render them below runtime completions.
pub const HISTORY_CLASS_NAME: &str = "additional";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub class_name: Option<String>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            class_name: None,
        }
    }

    pub fn with_class(title: impl Into<String>, class_name: &str) -> Self {
        Self {
            title: title.into(),
            class_name: Some(class_name.to_string()),
        }
    }
}

/// Completions for text in the current execution context.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// `before` is everything ahead of the token being typed, `prefix` the
    /// token itself. Cheap sources may ignore `force_expensive`.
    async fn completions_for_text(
        &self,
        before: &str,
        prefix: &str,
        force_expensive: bool,
    ) -> Result<Vec<String>>;
}

/// Range of the token ending at `column` on `line`.
///
/// Scans the chars before `column` right to left for the nearest boundary
/// char; the token starts just after it, or at column 0.
pub fn substitute_range(line_text: &str, line: usize, column: usize) -> TextRange {
    let chars: Vec<char> = line_text.chars().collect();
    let column = column.min(chars.len());
    let start = chars[..column]
        .iter()
        .rposition(|c| BOUNDARY_CHARS.contains(*c))
        .map_or(0, |i| i + 1);
    TextRange::new(line, start, line, column)
}

/// History entries that extend `text`, newest first, deduplicated, at most
/// `limit`. Titles drop the part of `text` that precedes `prefix`, so they
/// replace just the token being completed.
pub fn history_suggestions(entries: &[String], text: &str, prefix: &str, limit: usize) -> Vec<Suggestion> {
    let skip = text.chars().count().saturating_sub(prefix.chars().count());
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for entry in entries.iter().rev() {
        if result.len() >= limit {
            break;
        }
        if !entry.starts_with(text) || !seen.insert(entry.as_str()) {
            continue;
        }
        let title: String = entry.chars().skip(skip).collect();
        result.push(Suggestion::with_class(title, HISTORY_CLASS_NAME));
    }
    result
}

/// Runtime words first, then history; no dedup across the two.
pub fn merge_suggestions(words: Vec<String>, history: Vec<Suggestion>) -> Vec<Suggestion> {
    words.into_iter().map(Suggestion::new).chain(history).collect()
}

/// Completes from a fixed vocabulary by prefix match.
pub struct WordListSource {
    words: Vec<String>,
}

impl WordListSource {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }
}

#[async_trait]
impl CompletionSource for WordListSource {
    async fn completions_for_text(
        &self,
        _before: &str,
        prefix: &str,
        _force_expensive: bool,
    ) -> Result<Vec<String>> {
        Ok(self
            .words
            .iter()
            .filter(|w| w.starts_with(prefix))
            .cloned()
            .collect())
    }
}
