//! Documents: one open file or untitled buffer, plus its cursor.

use scribe_buffer::{Cursor, Position, TextBuffer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::CoreResult;

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Creates a new unique document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document composes a text buffer with a cursor and a display name.
///
/// The buffer owns the content, the undo history, the modified flag and the
/// file path; the document layers the editing operations a user sees: line
/// manipulation, selections, navigation.
pub struct Document {
    /// Unique identifier
    id: DocumentId,

    /// The underlying text buffer
    buffer: TextBuffer,

    /// Cursor state (position + selection anchor)
    cursor: Cursor,

    /// Display name ("Untitled" until a path is known)
    name: String,
}

impl Document {
    /// Creates a new empty untitled document.
    pub fn new() -> Self {
        Self {
            id: DocumentId::new(),
            buffer: TextBuffer::new(),
            cursor: Cursor::at_start(),
            name: "Untitled".to_string(),
        }
    }

    /// Opens a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let buffer = TextBuffer::from_file(path)?;
        let name = Self::name_for(path);

        Ok(Self {
            id: DocumentId::new(),
            buffer,
            cursor: Cursor::at_start(),
            name,
        })
    }

    fn name_for(path: &Path) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    // ==================== Getters ====================

    /// Returns the document ID.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Returns the file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.buffer.file_path()
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Returns true for an untouched untitled document: no path, no edits,
    /// no content. Such a tab is reused when a file is opened.
    pub fn is_pristine_untitled(&self) -> bool {
        self.path().is_none() && !self.is_modified() && self.buffer.is_empty()
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns a mutable reference to the buffer.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// Returns the cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Returns the cursor position.
    pub fn cursor_position(&self) -> Position {
        self.cursor.position
    }

    /// Returns the line count.
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Returns all text.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.buffer.text()
    }

    // ==================== File Operations ====================

    /// Saves the document to its known path.
    pub fn save(&mut self) -> CoreResult<()> {
        self.buffer.save()?;
        Ok(())
    }

    /// Saves the document to a new path and renames it accordingly.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.buffer.save_as(path)?;
        self.name = Self::name_for(path);
        Ok(())
    }

    // ==================== Cursor & Selection ====================

    /// Moves the cursor, clamping to the document, and clears selection.
    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.clamp(pos);
        self.cursor.move_to(pos);
    }

    /// Sets a selection range, clamping both ends.
    pub fn set_selection(&mut self, start: Position, end: Position) {
        let (start, end) = (self.clamp(start), self.clamp(end));
        self.cursor.select_range(start, end);
    }

    /// Clamps a position to a valid cursor location.
    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.buffer.len_lines().saturating_sub(1));
        let column = pos.column.min(self.line_content_len(line));
        Position::new(line, column)
    }

    /// Length of a line in characters, excluding its trailing newline.
    fn line_content_len(&self, line: usize) -> usize {
        let len = self.buffer.line_len(line).unwrap_or(0);
        let text = self.buffer.line(line).unwrap_or_default();
        if text.ends_with('\n') { len - 1 } else { len }
    }

    fn line_content(&self, line: usize) -> String {
        let text = self.buffer.line(line).unwrap_or_default();
        text.strip_suffix('\n').unwrap_or(&text).to_string()
    }

    /// Character index of the cursor.
    pub fn cursor_char_idx(&self) -> usize {
        self.buffer
            .position_to_char_idx(self.cursor.position)
            .unwrap_or_else(|_| self.buffer.len_chars())
    }

    /// Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.cursor.selection_range()?;
        let start_idx = self.buffer.position_to_char_idx(start).ok()?;
        let end_idx = self.buffer.position_to_char_idx(end).ok()?;
        self.buffer
            .slice(start_idx..end_idx)
            .ok()
            .map(|s| s.into_owned())
    }

    /// Selects the word under the cursor, if any.
    pub fn select_word(&mut self) {
        let line = self.cursor.position.line;
        let text = self.line_content(line);
        let chars: Vec<char> = text.chars().collect();
        let col = self.cursor.position.column.min(chars.len());

        let at = |i: usize| chars.get(i).copied().map(scribe_buffer::search::is_word_char);

        // Anchor on the word the cursor touches, preferring the one it is in
        let mut start = col;
        if at(start) != Some(true) {
            if start > 0 && at(start - 1) == Some(true) {
                start -= 1;
            } else {
                return;
            }
        }
        while start > 0 && at(start - 1) == Some(true) {
            start -= 1;
        }
        let mut end = start;
        while at(end) == Some(true) {
            end += 1;
        }

        self.cursor
            .select_range(Position::new(line, start), Position::new(line, end));
    }

    /// Selects the current line, excluding its trailing newline.
    pub fn select_line(&mut self) {
        let line = self.cursor.position.line;
        let end = Position::new(line, self.line_content_len(line));
        self.cursor.select_range(Position::new(line, 0), end);
    }

    /// Selects all text.
    pub fn select_all(&mut self) {
        let last = self.buffer.len_lines().saturating_sub(1);
        let end = Position::new(last, self.line_content_len(last));
        self.cursor.select_range(Position::ZERO, end);
    }

    /// Moves the cursor to the start of a line, clamping to the document.
    pub fn go_to_line(&mut self, line: usize) {
        let line = line.min(self.buffer.len_lines().saturating_sub(1));
        self.cursor.move_to(Position::new(line, 0));
    }

    // ==================== Text Editing ====================

    /// Inserts text at the cursor, replacing the selection if any.
    ///
    /// A replace-selection insert is one undo step.
    pub fn insert_at_cursor(&mut self, text: &str) -> CoreResult<()> {
        if let Some((start, end)) = self.cursor.selection_range() {
            let start_idx = self.buffer.position_to_char_idx(start)?;
            let end_idx = self.buffer.position_to_char_idx(end)?;
            self.buffer.begin_edit_group();
            self.buffer.delete(start_idx..end_idx)?;
            self.buffer.insert(start_idx, text)?;
            self.buffer.end_edit_group();
            let new_idx = start_idx + text.chars().count();
            let pos = self.buffer.char_idx_to_position(new_idx)?;
            self.cursor.move_to(pos);
            return Ok(());
        }

        let idx = self.cursor_char_idx();
        self.buffer.insert(idx, text)?;
        let new_idx = idx + text.chars().count();
        let pos = self.buffer.char_idx_to_position(new_idx)?;
        self.cursor.move_to(pos);
        Ok(())
    }

    /// Deletes the selection, or the character before the cursor.
    pub fn delete_backward(&mut self) -> CoreResult<()> {
        if self.cursor.has_selection() {
            return self.delete_selection();
        }

        let idx = self.cursor_char_idx();
        if idx > 0 {
            self.buffer.delete(idx - 1..idx)?;
            let pos = self.buffer.char_idx_to_position(idx - 1)?;
            self.cursor.move_to(pos);
        }
        Ok(())
    }

    /// Deletes the selection, or the character after the cursor.
    pub fn delete_forward(&mut self) -> CoreResult<()> {
        if self.cursor.has_selection() {
            return self.delete_selection();
        }

        let idx = self.cursor_char_idx();
        if idx < self.buffer.len_chars() {
            self.buffer.delete(idx..idx + 1)?;
        }
        Ok(())
    }

    /// Deletes the current selection.
    pub fn delete_selection(&mut self) -> CoreResult<()> {
        if let Some((start, end)) = self.cursor.selection_range() {
            let start_idx = self.buffer.position_to_char_idx(start)?;
            let end_idx = self.buffer.position_to_char_idx(end)?;
            self.buffer.delete(start_idx..end_idx)?;
            self.cursor.move_to(start);
        }
        Ok(())
    }

    // ==================== Line Operations ====================

    /// Duplicates the current line (or the selection) below itself.
    pub fn duplicate_line(&mut self) -> CoreResult<()> {
        if let Some((start, end)) = self.cursor.selection_range() {
            let start_idx = self.buffer.position_to_char_idx(start)?;
            let end_idx = self.buffer.position_to_char_idx(end)?;
            let text = self.buffer.slice(start_idx..end_idx)?.into_owned();
            self.buffer.insert(end_idx, &text)?;
            let after = end_idx + text.chars().count();
            let pos = self.buffer.char_idx_to_position(after)?;
            self.cursor.move_to(pos);
            return Ok(());
        }

        let line = self.cursor.position.line;
        let text = self.line_content(line);
        let end_idx = self
            .buffer
            .position_to_char_idx(Position::new(line, self.line_content_len(line)))?;

        self.buffer.begin_edit_group();
        self.buffer.insert(end_idx, &format!("\n{}", text))?;
        self.buffer.end_edit_group();

        let pos = self.clamp(Position::new(line + 1, self.cursor.position.column));
        self.cursor.move_to(pos);
        Ok(())
    }

    /// Deletes the line containing the cursor. No-op on an empty document.
    pub fn delete_line(&mut self) -> CoreResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let line = self.cursor.position.line;
        let start_idx = self.buffer.position_to_char_idx(Position::new(line, 0))?;
        let content_end = start_idx + self.line_content_len(line);

        self.buffer.begin_edit_group();
        if content_end < self.buffer.len_chars() {
            // Line has a trailing newline: remove it with the line
            self.buffer.delete(start_idx..content_end + 1)?;
        } else if start_idx > 0 {
            // Last line: remove the newline that precedes it
            self.buffer.delete(start_idx - 1..content_end)?;
        } else {
            self.buffer.delete(start_idx..content_end)?;
        }
        self.buffer.end_edit_group();

        let pos = self.clamp(Position::new(line, 0));
        self.cursor.move_to(pos);
        Ok(())
    }

    /// Swaps the current line with the one above. No-op on line 0.
    pub fn move_line_up(&mut self) -> CoreResult<()> {
        let line = self.cursor.position.line;
        if line == 0 {
            return Ok(());
        }

        let above = self.line_content(line - 1);
        let current = self.line_content(line);

        let start_idx = self
            .buffer
            .position_to_char_idx(Position::new(line - 1, 0))?;
        let end_idx = self
            .buffer
            .position_to_char_idx(Position::new(line, self.line_content_len(line)))?;

        self.buffer.begin_edit_group();
        self.buffer
            .replace(start_idx..end_idx, &format!("{}\n{}", current, above))?;
        self.buffer.end_edit_group();

        let pos = self.clamp(Position::new(line - 1, self.cursor.position.column));
        self.cursor.move_to(pos);
        Ok(())
    }

    /// Swaps the current line with the one below. No-op on the last line.
    pub fn move_line_down(&mut self) -> CoreResult<()> {
        let line = self.cursor.position.line;
        if line + 1 >= self.buffer.len_lines() {
            return Ok(());
        }

        let current = self.line_content(line);
        let below = self.line_content(line + 1);

        let start_idx = self.buffer.position_to_char_idx(Position::new(line, 0))?;
        let end_idx = self
            .buffer
            .position_to_char_idx(Position::new(line + 1, self.line_content_len(line + 1)))?;

        self.buffer.begin_edit_group();
        self.buffer
            .replace(start_idx..end_idx, &format!("{}\n{}", below, current))?;
        self.buffer.end_edit_group();

        let pos = self.clamp(Position::new(line + 1, self.cursor.position.column));
        self.cursor.move_to(pos);
        Ok(())
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit group and reseats the cursor.
    pub fn undo(&mut self) -> CoreResult<()> {
        let idx = self.buffer.undo()?;
        let pos = self.buffer.char_idx_to_position(idx)?;
        self.cursor.move_to(pos);
        Ok(())
    }

    /// Redoes the last undone edit group and reseats the cursor.
    pub fn redo(&mut self) -> CoreResult<()> {
        let idx = self.buffer.redo()?;
        let pos = self.buffer.char_idx_to_position(idx)?;
        self.cursor.move_to(pos);
        Ok(())
    }

    // ==================== View Sync ====================

    /// Reconciles the buffer with a full-text snapshot from the view.
    ///
    /// The edit widget owns keystroke handling; after it applies an action
    /// the new text comes back here. The common prefix and suffix are
    /// trimmed so only the changed middle is recorded, which lets the
    /// history coalesce a typing burst into one undo step.
    pub fn sync_text(&mut self, new_text: &str) -> CoreResult<()> {
        let old: Vec<char> = self.buffer.text().chars().collect();
        let new: Vec<char> = new_text.chars().collect();

        if old == new {
            return Ok(());
        }

        let mut prefix = 0;
        while prefix < old.len() && prefix < new.len() && old[prefix] == new[prefix] {
            prefix += 1;
        }
        let mut suffix = 0;
        while suffix < old.len() - prefix
            && suffix < new.len() - prefix
            && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix]
        {
            suffix += 1;
        }

        let removed: String = old[prefix..old.len() - suffix].iter().collect();
        let inserted: String = new[prefix..new.len() - suffix].iter().collect();

        match (removed.is_empty(), inserted.is_empty()) {
            (false, false) => {
                self.buffer.begin_edit_group();
                self.buffer.delete(prefix..prefix + removed.chars().count())?;
                self.buffer.insert(prefix, &inserted)?;
                self.buffer.end_edit_group();
            }
            (false, true) => {
                self.buffer.delete(prefix..prefix + removed.chars().count())?;
            }
            (true, false) => {
                self.buffer.insert(prefix, &inserted)?;
            }
            (true, true) => {}
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        let mut d = Document::new();
        d.buffer_mut().insert(0, text).unwrap();
        d.buffer_mut().set_modified(false);
        d
    }

    #[test]
    fn test_untitled_defaults() {
        let d = Document::new();
        assert_eq!(d.name(), "Untitled");
        assert!(d.path().is_none());
        assert!(d.is_pristine_untitled());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "Test content\nLine 2").unwrap();

        let mut d = Document::from_file(&path).unwrap();
        assert_eq!(d.name(), "test.txt");
        assert_eq!(d.text(), "Test content\nLine 2");
        assert!(!d.is_modified());

        d.save().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Test content\nLine 2");
    }

    #[test]
    fn test_save_as_renames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renamed.rs");

        let mut d = doc("fn main() {}");
        d.save_as(&path).unwrap();
        assert_eq!(d.name(), "renamed.rs");
        assert_eq!(d.path(), Some(path.as_path()));
        assert!(!d.is_modified());
    }

    #[test]
    fn test_duplicate_line() {
        let mut d = doc("Line 1\nLine 2\nLine 3");
        d.set_cursor(Position::new(0, 0));

        d.duplicate_line().unwrap();
        let text = d.text().into_owned();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Line 1");
        assert_eq!(lines[1], "Line 1");
        assert_eq!(d.cursor_position().line, 1);
    }

    #[test]
    fn test_duplicate_last_line() {
        let mut d = doc("a\nb\nc");
        d.set_cursor(Position::new(2, 0));

        d.duplicate_line().unwrap();
        assert_eq!(d.text(), "a\nb\nc\nc");
        assert_eq!(d.line_count(), 4);
    }

    #[test]
    fn test_duplicate_line_is_single_undo_step() {
        let mut d = doc("a\nb");
        d.set_cursor(Position::new(0, 0));
        d.duplicate_line().unwrap();
        d.undo().unwrap();
        assert_eq!(d.text(), "a\nb");
    }

    #[test]
    fn test_delete_line() {
        let mut d = doc("Line 1\nLine 2\nLine 3");
        d.set_cursor(Position::new(1, 2));

        d.delete_line().unwrap();
        assert_eq!(d.text(), "Line 1\nLine 3");
    }

    #[test]
    fn test_delete_last_line_takes_preceding_newline() {
        let mut d = doc("Line 1\nLine 2");
        d.set_cursor(Position::new(1, 0));

        d.delete_line().unwrap();
        assert_eq!(d.text(), "Line 1");
    }

    #[test]
    fn test_delete_line_on_empty_document_is_noop() {
        let mut d = Document::new();
        d.delete_line().unwrap();
        assert_eq!(d.text(), "");
        assert!(!d.is_modified());
    }

    #[test]
    fn test_move_line_down() {
        let mut d = doc("Line 1\nLine 2\nLine 3");
        d.set_cursor(Position::new(0, 0));

        d.move_line_down().unwrap();
        assert_eq!(d.text(), "Line 2\nLine 1\nLine 3");
        assert_eq!(d.cursor_position().line, 1);
    }

    #[test]
    fn test_move_line_up() {
        let mut d = doc("Line 1\nLine 2\nLine 3");
        d.set_cursor(Position::new(1, 0));

        d.move_line_up().unwrap();
        assert_eq!(d.text(), "Line 2\nLine 1\nLine 3");
        assert_eq!(d.cursor_position().line, 0);
    }

    #[test]
    fn test_move_first_line_up_is_noop() {
        let mut d = doc("Line 1\nLine 2");
        d.set_cursor(Position::new(0, 0));

        d.move_line_up().unwrap();
        assert_eq!(d.text(), "Line 1\nLine 2");
        assert!(!d.is_modified());
    }

    #[test]
    fn test_move_last_line_down_is_noop() {
        let mut d = doc("Line 1\nLine 2");
        d.set_cursor(Position::new(1, 3));

        d.move_line_down().unwrap();
        assert_eq!(d.text(), "Line 1\nLine 2");
        assert!(!d.is_modified());
    }

    #[test]
    fn test_move_line_is_single_undo_step() {
        let mut d = doc("a\nb\nc");
        d.set_cursor(Position::new(1, 0));
        d.move_line_up().unwrap();
        assert_eq!(d.text(), "b\na\nc");
        d.undo().unwrap();
        assert_eq!(d.text(), "a\nb\nc");
    }

    #[test]
    fn test_delete_backward_and_forward() {
        let mut d = doc("abc");
        d.set_cursor(Position::new(0, 2));

        d.delete_backward().unwrap();
        assert_eq!(d.text(), "ac");
        assert_eq!(d.cursor_position(), Position::new(0, 1));

        d.delete_forward().unwrap();
        assert_eq!(d.text(), "a");
    }

    #[test]
    fn test_delete_with_selection_removes_it() {
        let mut d = doc("Hello World");
        d.set_selection(Position::new(0, 5), Position::new(0, 11));

        d.delete_backward().unwrap();
        assert_eq!(d.text(), "Hello");
        assert!(!d.cursor().has_selection());
    }

    #[test]
    fn test_select_word() {
        let mut d = doc("Hello World");
        d.set_cursor(Position::new(0, 2));

        d.select_word();
        assert_eq!(d.selected_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_select_word_at_word_end() {
        let mut d = doc("Hello World");
        d.set_cursor(Position::new(0, 5));

        d.select_word();
        assert_eq!(d.selected_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_select_line() {
        let mut d = doc("Line 1\nLine 2");
        d.set_cursor(Position::new(0, 3));

        d.select_line();
        assert_eq!(d.selected_text().as_deref(), Some("Line 1"));
    }

    #[test]
    fn test_select_all() {
        let mut d = doc("Line 1\nLine 2");
        d.select_all();
        assert_eq!(d.selected_text().as_deref(), Some("Line 1\nLine 2"));
    }

    #[test]
    fn test_go_to_line_clamps() {
        let mut d = doc("a\nb\nc");
        d.go_to_line(1);
        assert_eq!(d.cursor_position(), Position::new(1, 0));
        d.go_to_line(999);
        assert_eq!(d.cursor_position().line, 2);
    }

    #[test]
    fn test_insert_over_selection_is_single_undo_step() {
        let mut d = doc("Hello World");
        d.set_selection(Position::new(0, 0), Position::new(0, 5));
        d.insert_at_cursor("Goodbye").unwrap();
        assert_eq!(d.text(), "Goodbye World");
        d.undo().unwrap();
        assert_eq!(d.text(), "Hello World");
    }

    #[test]
    fn test_sync_text_records_minimal_edit() {
        let mut d = doc("Hello World");
        d.sync_text("Hello brave World").unwrap();
        assert_eq!(d.text(), "Hello brave World");
        assert!(d.is_modified());

        d.undo().unwrap();
        assert_eq!(d.text(), "Hello World");
    }

    #[test]
    fn test_sync_text_identical_is_noop() {
        let mut d = doc("same");
        d.sync_text("same").unwrap();
        assert!(!d.is_modified());
        assert!(!d.buffer().can_undo());
    }
}
