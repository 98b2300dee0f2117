pub mod completion;
pub mod editor;
pub mod history;
pub mod keys;
pub mod prompt;

pub use completion::{CompletionSource, Suggestion, WordListSource};
pub use editor::{BufferEditor, BufferEditorFactory, Editor, EditorFactory, EditorOptions, TextRange, Widget};
pub use history::HistoryManager;
pub use keys::{KeyCode, KeyEvent};
pub use prompt::PromptController;
