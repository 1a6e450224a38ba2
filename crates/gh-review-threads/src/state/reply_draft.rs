//! Reply drafts, one per thread.

use crate::model::ThreadId;
use std::collections::HashMap;

/// Text of a reply being composed, with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDraft {
    pub body: String,
    pub cursor: usize,
}

impl ReplyDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft holding `body` with the cursor at its end.
    pub fn with_body(body: impl Into<String>) -> Self {
        let body = body.into();
        let cursor = body.len();
        Self { body, cursor }
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.body.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        self.body.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev_char_start = self.body[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.body.remove(prev_char_start);
            self.cursor = prev_char_start;
        }
    }

    /// Delete the character at the cursor (delete key).
    pub fn delete_char_at(&mut self) {
        if self.cursor < self.body.len() {
            self.body.remove(self.cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.body[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.body.len() {
            self.cursor = self.body[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.body.len());
        }
    }

    /// Move cursor to the start of the current line.
    pub fn cursor_home(&mut self) {
        self.cursor = self.body[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// Move cursor to the end of the current line.
    pub fn cursor_end(&mut self) {
        self.cursor = self.body[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.body.len());
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Whether there is nothing worth posting (ignoring whitespace).
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Current line number (0-indexed).
    pub fn current_line(&self) -> usize {
        self.body[..self.cursor].matches('\n').count()
    }

    /// Cursor column on the current line, in characters.
    pub fn current_column(&self) -> usize {
        let line_start = self.body[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.body[line_start..self.cursor].chars().count()
    }

    /// Take the text out, leaving the draft empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.body)
    }
}

/// Drafts keyed by thread id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDrafts {
    drafts: HashMap<ThreadId, ReplyDraft>,
}

impl ReplyDrafts {
    pub fn get(&self, thread_id: &str) -> Option<&ReplyDraft> {
        self.drafts.get(thread_id)
    }

    pub fn get_mut(&mut self, thread_id: &str) -> Option<&mut ReplyDraft> {
        self.drafts.get_mut(thread_id)
    }

    /// The draft for a thread, created empty on first use.
    pub fn entry(&mut self, thread_id: &str) -> &mut ReplyDraft {
        self.drafts.entry(thread_id.to_string()).or_default()
    }

    /// Snapshot and clear a thread's draft.
    pub fn take(&mut self, thread_id: &str) -> Option<String> {
        self.drafts.get_mut(thread_id).map(ReplyDraft::take)
    }

    /// Put text back after a failed post, unless something new was typed meanwhile.
    ///
    /// Returns whether the text was restored.
    pub fn restore(&mut self, thread_id: &str, body: String) -> bool {
        let draft = self.entry(thread_id);
        if draft.is_empty() {
            *draft = ReplyDraft::with_body(body);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, thread_id: &str) -> Option<ReplyDraft> {
        self.drafts.remove(thread_id)
    }

    /// Whether the thread has text worth posting.
    pub fn has_text(&self, thread_id: &str) -> bool {
        self.get(thread_id).is_some_and(|d| !d.is_empty())
    }

    /// Drop drafts for threads that no longer exist, keeping non-empty ones.
    pub fn retain_threads<'a>(&mut self, thread_ids: impl IntoIterator<Item = &'a str>) {
        let known: std::collections::HashSet<&str> = thread_ids.into_iter().collect();
        self.drafts
            .retain(|id, draft| known.contains(id.as_str()) || !draft.is_empty());
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut draft = ReplyDraft::new();

        draft.insert_str("Hello");
        assert_eq!(draft.body, "Hello");
        assert_eq!(draft.cursor, 5);

        draft.insert_char('!');
        assert_eq!(draft.body, "Hello!");

        draft.delete_char_before();
        assert_eq!(draft.body, "Hello");

        draft.cursor = 0;
        draft.delete_char_at();
        assert_eq!(draft.body, "ello");
    }

    #[test]
    fn test_cursor_movement() {
        let mut draft = ReplyDraft::with_body("Hello\nWorld");

        draft.cursor_home();
        assert_eq!(draft.cursor, 6);

        draft.cursor_end();
        assert_eq!(draft.cursor, 11);

        draft.cursor = 0;
        draft.cursor_end();
        assert_eq!(draft.cursor, 5);
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut draft = ReplyDraft::with_body("né");
        draft.cursor_left();
        assert_eq!(draft.cursor, 1);
        assert_eq!(draft.current_column(), 1);
        draft.cursor_right();
        assert_eq!(draft.cursor, 3);
        draft.delete_char_before();
        assert_eq!(draft.body, "n");
    }

    #[test]
    fn test_take_and_restore() {
        let mut drafts = ReplyDrafts::default();
        drafts.entry("t1").insert_str("LGTM");
        assert!(drafts.has_text("t1"));

        let body = drafts.take("t1").unwrap();
        assert_eq!(body, "LGTM");
        assert!(!drafts.has_text("t1"));

        assert!(drafts.restore("t1", body));
        assert_eq!(drafts.get("t1").unwrap().body, "LGTM");
        assert_eq!(drafts.get("t1").unwrap().cursor, 4);
    }

    #[test]
    fn test_restore_keeps_new_text() {
        let mut drafts = ReplyDrafts::default();
        drafts.entry("t1").insert_str("newer");

        assert!(!drafts.restore("t1", "older".to_string()));
        assert_eq!(drafts.get("t1").unwrap().body, "newer");
    }

    #[test]
    fn test_retain_threads() {
        let mut drafts = ReplyDrafts::default();
        drafts.entry("gone-empty");
        drafts.entry("gone-text").insert_str("keep me");
        drafts.entry("kept");

        drafts.retain_threads(["kept"]);
        assert!(drafts.get("gone-empty").is_none());
        assert!(drafts.get("gone-text").is_some());
        assert!(drafts.get("kept").is_some());
    }
}
