//! Core text buffer backed by a rope.
//!
//! A rope keeps insertions and deletions O(log n) in large documents and
//! shares chunks cheaply on clone, which is what a multi-tab editor wants.
//! Every mutation is recorded in the undo [`History`]; callers wrap compound
//! operations in `begin_edit_group`/`end_edit_group` so they undo as one
//! step.

use ropey::Rope;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::history::{Edit, EditKind, History};
use crate::{BufferError, BufferResult, Position};

/// A text buffer with undo history, a modified flag and an optional
/// associated file path.
///
/// `TextBuffer` is `Send` but not `Sync`: it moves between threads but is
/// mutated from one place at a time. The editor mutates it only on the UI
/// thread.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding the text content
    rope: Rope,

    /// Edit history for undo/redo
    history: History,

    /// Whether the buffer has unsaved changes
    modified: bool,

    /// Associated file path (None for untitled buffers)
    file_path: Option<PathBuf>,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self::with_history_limit(1000)
    }

    /// Creates an empty buffer with a custom undo depth.
    pub fn with_history_limit(max_history: usize) -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(max_history),
            modified: false,
            file_path: None,
        }
    }

    /// Loads a buffer from a file, decoding UTF-8.
    ///
    /// Fails with an I/O error if the path is unreadable or the content is
    /// not valid UTF-8. The modified flag starts cleared.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let rope = Rope::from_str(&content);

        Ok(Self {
            rope,
            history: History::new(1000),
            modified: false,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Saves the buffer to its associated file.
    pub fn save(&mut self) -> BufferResult<()> {
        let path = self
            .file_path
            .clone()
            .ok_or(BufferError::NoFilePath)?;
        self.save_as(&path)
    }

    /// Saves the buffer to a specific path as UTF-8.
    ///
    /// Writes to a temporary file first, then renames, so a failed write
    /// never truncates the original.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, self.text().as_bytes())?;
        std::fs::rename(&temp_path, path)?;

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    // ==================== Text Access ====================

    /// Returns the entire text content as a `Cow<str>`.
    ///
    /// Borrowed for small buffers, allocated when the rope spans chunks.
    #[inline]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its trailing newline
    /// if present.
    pub fn line(&self, line_idx: usize) -> BufferResult<std::borrow::Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<std::borrow::Cow<'_, str>> {
        if range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts the
    /// empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the length of a specific line in characters, including its
    /// trailing newline if present.
    pub fn line_len(&self, line_idx: usize) -> BufferResult<usize> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).len_chars())
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index, recording the edit for undo.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        self.modified = true;

        Ok(())
    }

    /// Inserts text at a line:column position.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> BufferResult<()> {
        let char_idx = self.position_to_char_idx(pos)?;
        self.insert(char_idx, text)
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        self.modified = true;

        Ok(deleted)
    }

    /// Replaces text in a range with new text, returning what was removed.
    ///
    /// Recorded as a delete plus an insert; wrap in an edit group when the
    /// replacement must undo together with other edits.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        let deleted = self.delete(range.clone())?;
        self.insert(range.start, text)?;
        Ok(deleted)
    }

    /// Opens an undo group: all edits until `end_edit_group` undo as one
    /// step.
    pub fn begin_edit_group(&mut self) {
        self.history.begin_group();
    }

    /// Closes the current undo group.
    pub fn end_edit_group(&mut self) {
        self.history.end_group();
    }

    // ==================== Undo/Redo ====================

    /// Undoes the most recent edit group.
    ///
    /// Returns the character index where the cursor should land.
    pub fn undo(&mut self) -> BufferResult<usize> {
        let group = self.history.undo().ok_or(BufferError::NothingToUndo)?;

        // Apply inverse operations in reverse order, without recording
        for edit in group.edits.iter().rev() {
            match edit.kind {
                EditKind::Insert => {
                    let end = edit.position + edit.content.chars().count();
                    self.rope.remove(edit.position..end);
                }
                EditKind::Delete => {
                    self.rope.insert(edit.position, &edit.content);
                }
            }
        }

        self.modified = true;
        Ok(group
            .edits
            .first()
            .map(|e| e.position.min(self.len_chars()))
            .unwrap_or(0))
    }

    /// Redoes the most recently undone edit group.
    ///
    /// Returns the character index where the cursor should land.
    pub fn redo(&mut self) -> BufferResult<usize> {
        let group = self.history.redo().ok_or(BufferError::NothingToRedo)?;

        // Re-apply in order, without recording
        let mut cursor = 0;
        for edit in &group.edits {
            match edit.kind {
                EditKind::Insert => {
                    self.rope.insert(edit.position, &edit.content);
                    cursor = edit.position + edit.content.chars().count();
                }
                EditKind::Delete => {
                    let end = edit.position + edit.content.chars().count();
                    self.rope.remove(edit.position..end);
                    cursor = edit.position;
                }
            }
        }

        self.modified = true;
        Ok(cursor.min(self.len_chars()))
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Position Conversion ====================

    /// Converts a Position (line, column) to a character index.
    ///
    /// The column may sit at the end of the line (for insertion).
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();

        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let column = char_idx - line_start;

        Ok(Position { line, column })
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Sets the modification state.
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Returns the associated file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            history: History::new(1000),
            modified: false,
            file_path: None,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_save_and_reload_roundtrips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");

        let mut buffer = TextBuffer::from("line one\nline two\nügraph χ\n");
        buffer.save_as(&path).unwrap();
        assert!(!buffer.is_modified());

        let reloaded = TextBuffer::from_file(&path).unwrap();
        assert_eq!(reloaded.text(), buffer.text());
        assert_eq!(
            std::fs::read(&path).unwrap(),
            buffer.text().as_bytes()
        );
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut buffer = TextBuffer::from("text");
        assert!(matches!(buffer.save(), Err(BufferError::NoFilePath)));
    }

    #[test]
    fn test_load_nonexistent_file_fails() {
        assert!(TextBuffer::from_file("/nonexistent/path/file.txt").is_err());
    }

    #[test]
    fn test_grouped_replace_undoes_as_one_step() {
        let mut buffer = TextBuffer::from("foo foo foo");

        buffer.begin_edit_group();
        // Replace from the end so earlier positions stay valid
        buffer.replace(8..11, "bar").unwrap();
        buffer.replace(4..7, "bar").unwrap();
        buffer.replace(0..3, "bar").unwrap();
        buffer.end_edit_group();

        assert_eq!(buffer.text(), "bar bar bar");
        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "foo foo foo");
        buffer.redo().unwrap();
        assert_eq!(buffer.text(), "bar bar bar");
    }

    #[test]
    fn test_modified_flag_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");

        let mut buffer = TextBuffer::new();
        assert!(!buffer.is_modified());
        buffer.insert(0, "hello").unwrap();
        assert!(buffer.is_modified());
        buffer.save_as(&path).unwrap();
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_empty_edits_record_nothing() {
        let mut buffer = TextBuffer::from("abc");
        buffer.insert(1, "").unwrap();
        buffer.delete(2..2).unwrap();
        assert!(!buffer.can_undo());
        assert!(!buffer.is_modified());
    }

    proptest! {
        #[test]
        fn prop_position_char_idx_roundtrip(
            text in "[a-z \\n]{0,64}",
            idx_seed in 0usize..64,
        ) {
            let buffer = TextBuffer::from(text.as_str());
            let idx = idx_seed % (buffer.len_chars() + 1);
            let pos = buffer.char_idx_to_position(idx).unwrap();
            prop_assert_eq!(buffer.position_to_char_idx(pos).unwrap(), idx);
        }

        #[test]
        fn prop_insert_then_undo_restores_text(
            base in "[a-z\\n]{0,32}",
            inserted in "[a-z]{1,8}",
            at_seed in 0usize..32,
        ) {
            let mut buffer = TextBuffer::from(base.as_str());
            let at = at_seed % (buffer.len_chars() + 1);
            buffer.insert(at, &inserted).unwrap();
            buffer.undo().unwrap();
            prop_assert_eq!(buffer.text().into_owned(), base);
        }
    }
}
