use anyhow::{anyhow, Result};
use async_trait::async_trait;
use promptline_common::config::PromptConfig;
use promptline_core::completion::HISTORY_CLASS_NAME;
use promptline_core::{
    BufferEditorFactory, CompletionSource, KeyCode, KeyEvent, PromptController, Suggestion, TextRange, Widget,
    WordListSource,
};
use std::sync::{Arc, Mutex};

struct Host;

impl Widget for Host {
    fn has_focus(&self) -> bool {
        true
    }

    fn focus(&mut self) {}
}

/// Records every query and answers with fixed words.
struct RecordingSource {
    words: Vec<String>,
    calls: Mutex<Vec<(String, String, bool)>>,
}

#[async_trait]
impl CompletionSource for RecordingSource {
    async fn completions_for_text(&self, before: &str, prefix: &str, force_expensive: bool) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((before.to_string(), prefix.to_string(), force_expensive));
        Ok(self.words.clone())
    }
}

struct FailingSource;

#[async_trait]
impl CompletionSource for FailingSource {
    async fn completions_for_text(&self, _before: &str, _prefix: &str, _force: bool) -> Result<Vec<String>> {
        Err(anyhow!("execution context went away"))
    }
}

fn prompt_with(source: Arc<dyn CompletionSource>, history: &[&str], text: &str) -> PromptController {
    let mut prompt = PromptController::new(Box::new(Host), source, &PromptConfig::default());
    prompt.attach_editor(&BufferEditorFactory);
    for entry in history {
        prompt.history_mut().push(*entry);
    }
    prompt.set_text(text);
    prompt.move_caret_to_end_of_prompt();
    prompt
}

/// Range of the token at the caret, used as both prefix and substitute range.
fn caret_token(prompt: &PromptController) -> TextRange {
    let caret = prompt.editor().unwrap().selection();
    prompt.substitute_range(caret.end_line, caret.end_column).unwrap()
}

#[tokio::test]
async fn test_runtime_words_then_history_suffixes() {
    let source = Arc::new(RecordingSource {
        words: vec!["bar".to_string(), "baz".to_string()],
        calls: Mutex::new(Vec::new()),
    });
    let prompt = prompt_with(source.clone(), &["foo.bar()", "foo.baz()"], "foo.");

    let range = caret_token(&prompt);
    assert_eq!(range, TextRange::new(0, 4, 0, 4));
    let suggestions = prompt.words_with_prefix(range, range).await;

    assert_eq!(
        suggestions,
        vec![
            Suggestion::new("bar"),
            Suggestion::new("baz"),
            Suggestion::with_class("baz()", HISTORY_CLASS_NAME),
            Suggestion::with_class("bar()", HISTORY_CLASS_NAME),
        ]
    );
    let calls = source.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), [("foo.".to_string(), String::new(), false)]);
}

#[tokio::test]
async fn test_before_spans_previous_lines() {
    let source = Arc::new(RecordingSource {
        words: Vec::new(),
        calls: Mutex::new(Vec::new()),
    });
    let prompt = prompt_with(source.clone(), &[], "let a = 1;\nconsole.lo");

    let range = caret_token(&prompt);
    assert_eq!(range, TextRange::new(1, 8, 1, 10));
    prompt.words_with_prefix(range, range).await;

    let calls = source.calls.lock().unwrap();
    assert_eq!(calls[0].0, "let a = 1;\nconsole.");
    assert_eq!(calls[0].1, "lo");
}

#[tokio::test]
async fn test_failing_source_still_returns_history() {
    let prompt = prompt_with(Arc::new(FailingSource), &["window.open()"], "window.o");
    let range = caret_token(&prompt);
    let suggestions = prompt.words_with_prefix(range, range).await;
    assert_eq!(suggestions, vec![Suggestion::with_class("open()", HISTORY_CLASS_NAME)]);
}

#[tokio::test]
async fn test_history_suppressed_when_caret_not_at_end() {
    let source = Arc::new(WordListSource::new(vec!["document".to_string()]));
    let mut prompt = prompt_with(source, &["doc.write()"], "doc");
    prompt
        .editor_mut()
        .unwrap()
        .set_selection(TextRange::from_location(0, 2));

    let range = caret_token(&prompt);
    let suggestions = prompt.words_with_prefix(range, range).await;
    assert_eq!(suggestions, vec![Suggestion::new("document")]);
}

#[tokio::test]
async fn test_history_suppressed_when_disabled() {
    let source = Arc::new(WordListSource::new(Vec::new()));
    let mut prompt = prompt_with(source, &["doc.write()"], "doc");
    prompt.set_add_completions_from_history(false);

    let range = caret_token(&prompt);
    assert!(prompt.words_with_prefix(range, range).await.is_empty());
}

#[tokio::test]
async fn test_empty_prompt_offers_whole_history() {
    let source = Arc::new(WordListSource::new(Vec::new()));
    let prompt = prompt_with(source, &["a", "b", "a"], "");

    let range = caret_token(&prompt);
    let suggestions = prompt.words_with_prefix(range, range).await;
    let titles: Vec<_> = suggestions.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[tokio::test]
async fn test_request_reflects_state_when_issued() {
    let source = Arc::new(WordListSource::new(Vec::new()));
    let mut prompt = prompt_with(source, &["foo.one"], "foo.");

    let range = caret_token(&prompt);
    let pending = prompt.words_with_prefix(range, range);
    prompt.history_mut().push("foo.two");
    prompt.set_text("something else");

    let titles: Vec<_> = pending.await.into_iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["one"]);
}

#[tokio::test]
async fn test_unattached_prompt_yields_nothing() {
    let source = Arc::new(RecordingSource {
        words: vec!["never".to_string()],
        calls: Mutex::new(Vec::new()),
    });
    let prompt = PromptController::new(Box::new(Host), source.clone(), &PromptConfig::default());
    let range = TextRange::default();
    assert!(prompt.words_with_prefix(range, range).await.is_empty());
    assert!(source.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_limit_respected() {
    let entries: Vec<String> = (0..80).map(|i| format!("x.v{}", i)).collect();
    let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
    let prompt = prompt_with(Arc::new(WordListSource::new(Vec::new())), &refs, "x.");

    let range = caret_token(&prompt);
    let suggestions = prompt.words_with_prefix(range, range).await;
    assert_eq!(suggestions.len(), 50);
    assert_eq!(suggestions[0].title, "v79");
}

#[test]
fn test_cleared_prompt_starts_fresh_history_session() {
    let mut prompt = prompt_with(Arc::new(WordListSource::new(Vec::new())), &["a", "b"], "draft");
    let up = KeyEvent::new(KeyCode::Up);
    let down = KeyEvent::new(KeyCode::Down);

    assert!(prompt.handle_key_down(&up));
    assert_eq!(prompt.text(), "b");

    // Cancelled input: the prompt is cleared without a commit.
    prompt.history_mut().reset();
    prompt.set_text("new");
    prompt.move_caret_to_end_of_prompt();

    assert!(prompt.handle_key_down(&up));
    assert_eq!(prompt.text(), "b");
    assert!(prompt.handle_key_down(&down));
    assert_eq!(prompt.text(), "new");
    assert!(!prompt.handle_key_down(&down));
}
