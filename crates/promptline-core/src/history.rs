/// Ordered log of submitted entries with a previous/next navigation cursor.
///
/// The cursor ranges over `entries.len() + 1` slots; the last slot is the
/// live edit. Whatever was being typed when backward navigation started is
/// stashed and handed back when the cursor returns to that slot.
#[derive(Debug, Default)]
pub struct HistoryManager {
    entries: Vec<String>,
    cursor: usize,
    /// Text in the prompt when the current navigation session began.
    uncommitted_edit: Option<String>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step to the older entry. Returns None at the oldest entry (or when
    /// empty); the caller must then leave its text alone.
    pub fn previous(&mut self, current_text: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        if self.cursor == self.entries.len() {
            self.uncommitted_edit = Some(current_text.to_string());
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step to the newer entry, or back to the stashed edit. Returns None
    /// when already at the edit slot.
    pub fn next(&mut self) -> Option<String> {
        if self.cursor >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        if self.cursor == self.entries.len() {
            return Some(self.uncommitted_edit.take().unwrap_or_default());
        }
        Some(self.entries[self.cursor].clone())
    }

    /// Append a committed entry and start a fresh navigation session.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
        self.cursor = self.entries.len();
        self.uncommitted_edit = None;
    }

    /// End the navigation session without committing: the cursor goes back
    /// to the edit slot and the stashed edit is dropped.
    pub fn reset(&mut self) {
        self.cursor = self.entries.len();
        self.uncommitted_edit = None;
    }

    /// All entries, oldest first.
    pub fn history_data(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cursor is on a past entry rather than the edit slot.
    pub fn is_navigating(&self) -> bool {
        self.cursor < self.entries.len()
    }
}
