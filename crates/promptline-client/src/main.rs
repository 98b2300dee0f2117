// crates/promptline-client/src/main.rs
mod display;
mod edit;
mod history_file;
mod input;
mod terminal;

use anyhow::Result;
use edit::EditOutcome;
use input::KeyDecoder;
use promptline_common::config::{load_config, PromptConfig};
use promptline_core::{BufferEditorFactory, KeyEvent, PromptController, Widget, WordListSource};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use terminal::RawTerminal;
use tracing_subscriber::EnvFilter;

/// The terminal itself; it always has focus.
struct TerminalHost;

impl Widget for TerminalHost {
    fn has_focus(&self) -> bool {
        true
    }

    fn focus(&mut self) {}
}

struct App {
    prompt: PromptController,
    screen: display::Screen,
    history_path: Option<PathBuf>,
    stdout: std::io::Stdout,
}

impl App {
    fn new(config: &PromptConfig) -> Result<Self> {
        let source = Arc::new(WordListSource::new(config.completion.words.clone()));
        let mut prompt = PromptController::new(Box::new(TerminalHost), source, config);
        prompt.attach_editor(&BufferEditorFactory);

        let history_path = config.history.persist.then(|| PathBuf::from(&config.history.file));
        if let Some(ref path) = history_path {
            let entries = history_file::load(path)?;
            tracing::debug!("loaded {} history entries from {}", entries.len(), path.display());
            for entry in entries {
                prompt.history_mut().push(entry);
            }
        }

        Ok(Self {
            prompt,
            screen: display::Screen::new(&config.prompt.prompt),
            history_path,
            stdout: std::io::stdout(),
        })
    }

    fn write(&mut self, out: &str) -> Result<()> {
        self.stdout.write_all(out.as_bytes())?;
        self.stdout.flush()?;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(editor) = self.prompt.editor() else {
            return Ok(());
        };
        let text = editor.text();
        let caret = editor.selection();
        let out = self.screen.render(&text, caret.end_line, caret.end_column);
        self.write(&out)
    }

    /// Returns false when the session should end.
    async fn handle_key(&mut self, event: &KeyEvent) -> Result<bool> {
        if self.prompt.handle_key_down(event) {
            self.redraw()?;
            return Ok(true);
        }
        let Some(editor) = self.prompt.editor_mut() else {
            return Ok(true);
        };
        match edit::apply_key(editor, event) {
            EditOutcome::Changed => {}
            EditOutcome::Ignored => return Ok(true),
            EditOutcome::Submit => self.submit()?,
            EditOutcome::Complete => self.complete().await?,
            EditOutcome::Cancel => {
                self.write("^C")?;
                self.commit_line()?;
            }
            EditOutcome::Eof => {
                let out = self.screen.finish(&self.prompt.text());
                self.write(&out)?;
                return Ok(false);
            }
        }
        self.redraw()?;
        Ok(true)
    }

    fn submit(&mut self) -> Result<()> {
        let text = self.prompt.text();
        self.commit_line()?;
        if text.trim().is_empty() {
            return Ok(());
        }
        self.prompt.history_mut().push(text.clone());
        if let Some(ref path) = self.history_path {
            if let Err(e) = history_file::append(path, &text) {
                tracing::warn!("failed to save history: {}", e);
            }
        }
        Ok(())
    }

    /// Leave the current input on screen and start an empty prompt below.
    fn commit_line(&mut self) -> Result<()> {
        let out = self.screen.finish(&self.prompt.text());
        self.write(&out)?;
        self.prompt.clear_autocomplete();
        self.prompt.history_mut().reset();
        self.prompt.set_text("");
        Ok(())
    }

    async fn complete(&mut self) -> Result<()> {
        let Some(caret) = self.prompt.editor().map(|e| e.selection()) else {
            return Ok(());
        };
        let Some(range) = self.prompt.substitute_range(caret.end_line, caret.end_column) else {
            return Ok(());
        };
        let suggestions = self.prompt.words_with_prefix(range, range).await;
        let typed = self
            .prompt
            .editor()
            .map(|e| e.text_in_range(&range))
            .unwrap_or_default();

        match suggestions.as_slice() {
            [] => self.write(&display::render_bell())?,
            [only] => {
                if let Some(editor) = self.prompt.editor_mut() {
                    edit::accept_suggestion(editor, &range, only);
                }
            }
            _ => {
                let shared = edit::common_prefix(&suggestions);
                if shared.starts_with(&typed) && shared.len() > typed.len() {
                    if let Some(editor) = self.prompt.editor_mut() {
                        editor.replace_range(&range, &shared);
                    }
                } else {
                    let mut out = self.screen.finish(&self.prompt.text());
                    out.push_str(&display::render_suggestions(&suggestions));
                    self.write(&out)?;
                }
            }
        }
        Ok(())
    }
}

/// `RUST_LOG` directives, or warnings only.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let mut app = App::new(&config)?;

    let stdin = std::io::stdin();
    let _raw = RawTerminal::enable(&stdin)?;
    app.redraw()?;

    let mut decoder = KeyDecoder::new();
    let mut buf = [0u8; 1024];
    'read: loop {
        let n = nix::unistd::read(0, &mut buf)?;
        if n == 0 {
            break;
        }
        for event in decoder.feed(&buf[..n]) {
            if !app.handle_key(&event).await? {
                break 'read;
            }
        }
    }
    Ok(())
}
