//! Undo/redo history management.
//!
//! Every mutation of the buffer is recorded as an [`Edit`]. Edits are
//! collected into [`EditGroup`]s, and undo/redo always applies a whole
//! group at once. That is what makes compound operations (replace-all,
//! moving a line) a single undo step: the buffer opens a group, performs
//! its edits, and closes the group.
//!
//! Rapid keystrokes are coalesced into the previous group when they are
//! adjacent single-line edits arriving within a short window, so typing a
//! word undoes as one step rather than one character at a time.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation, positioned by character index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character position where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Returns the inverse of this edit (for undo).
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Returns true if this edit can be coalesced with a following one.
    ///
    /// Two edits coalesce when they are the same kind, adjacent, and
    /// neither crosses a line boundary.
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }

        // Don't coalesce across newlines
        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => {
                // Can coalesce if other is right after this insert
                self.position + self.content.chars().count() == other.position
            }
            EditKind::Delete => {
                // For backspace: other position + its length == this position
                // For forward delete: same position
                other.position + other.content.chars().count() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Coalesces another edit into this one.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => {
                self.content.push_str(&other.content);
            }
            EditKind::Delete => {
                if other.position < self.position {
                    // Backspace: prepend
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    // Forward delete: append
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// A group of edits that undo and redo together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// The edits in this group, in application order
    pub edits: Vec<Edit>,
    /// When this group was last extended; `None` disables coalescing
    pub timestamp: Option<Instant>,
}

impl EditGroup {
    /// Creates a group holding one edit.
    pub fn new(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            timestamp: Some(Instant::now()),
        }
    }

    /// Creates an empty group (opened by `begin_group`).
    fn empty() -> Self {
        Self {
            edits: Vec::new(),
            timestamp: None,
        }
    }

    /// Adds an edit to this group.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Returns a mutable reference to the last edit.
    pub fn last_mut(&mut self) -> Option<&mut Edit> {
        self.edits.last_mut()
    }

    /// Returns true if the group holds no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Manages undo/redo history.
///
/// Bounded depth keeps memory in check over long sessions; redo branches
/// are discarded on new edits, as in every mainstream editor.
#[derive(Debug, Clone)]
pub struct History {
    /// Stack of undoable edit groups
    undo_stack: VecDeque<EditGroup>,
    /// Stack of redoable edit groups
    redo_stack: Vec<EditGroup>,
    /// Group currently being built by `begin_group`/`end_group`
    open_group: Option<EditGroup>,
    /// Maximum number of edit groups to keep
    max_size: usize,
    /// Time threshold for coalescing edits
    coalesce_threshold: Duration,
}

impl History {
    /// Creates a new history with the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(64)),
            redo_stack: Vec::new(),
            open_group: None,
            max_size,
            coalesce_threshold: Duration::from_millis(300),
        }
    }

    /// Records an edit.
    ///
    /// Clears the redo stack. While a group is open the edit joins it;
    /// otherwise it may coalesce with the previous group or start a new one.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if let Some(group) = self.open_group.as_mut() {
            group.push(edit);
            return;
        }

        // Try to coalesce with the last group
        if let Some(last_group) = self.undo_stack.back_mut() {
            if let Some(timestamp) = last_group.timestamp {
                if timestamp.elapsed() < self.coalesce_threshold {
                    if let Some(last_edit) = last_group.last_mut() {
                        if last_edit.can_coalesce(&edit) {
                            last_edit.coalesce(edit);
                            last_group.timestamp = Some(Instant::now());
                            return;
                        }
                    }
                }
            }
        }

        self.undo_stack.push_back(EditGroup::new(edit));

        // Enforce capacity
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Opens an edit group: all edits until `end_group` become one undo step.
    pub fn begin_group(&mut self) {
        if self.open_group.is_none() {
            self.open_group = Some(EditGroup::empty());
        }
    }

    /// Closes the current edit group.
    pub fn end_group(&mut self) {
        if let Some(group) = self.open_group.take() {
            if !group.is_empty() {
                self.undo_stack.push_back(group);
                while self.undo_stack.len() > self.max_size {
                    self.undo_stack.pop_front();
                }
            }
        }
    }

    /// Takes the most recent group for undoing.
    ///
    /// The group moves to the redo stack; the caller applies the inverse
    /// of each edit in reverse order.
    pub fn undo(&mut self) -> Option<EditGroup> {
        let group = self.undo_stack.pop_back()?;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    /// Takes the most recently undone group for redoing.
    ///
    /// The group moves back to the undo stack (with coalescing disabled);
    /// the caller re-applies each edit in order.
    pub fn redo(&mut self) -> Option<EditGroup> {
        let mut group = self.redo_stack.pop()?;
        group.timestamp = None;
        self.undo_stack.push_back(group.clone());
        Some(group)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group = None;
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_inverse() {
        let insert = Edit::insert(0, "hello");
        let inverse = insert.inverse();

        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.position, 0);
        assert_eq!(inverse.content, "hello");
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new(100);

        history.push(Edit::insert(0, "a"));
        std::thread::sleep(Duration::from_millis(400)); // Prevent coalescing
        history.push(Edit::insert(1, "b"));

        assert_eq!(history.undo_count(), 2);
        let group = history.undo().unwrap();
        assert_eq!(group.edits[0].content, "b");

        assert!(history.can_redo());
        let group = history.redo().unwrap();
        assert_eq!(group.edits[0].content, "b");
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_edit_coalescing() {
        let mut e1 = Edit::insert(0, "a");
        let e2 = Edit::insert(1, "b");

        assert!(e1.can_coalesce(&e2));
        e1.coalesce(e2);
        assert_eq!(e1.content, "ab");
    }

    #[test]
    fn test_grouped_edits_undo_as_one() {
        let mut history = History::new(100);

        history.begin_group();
        history.push(Edit::delete(4, "foo"));
        history.push(Edit::insert(4, "bar"));
        history.push(Edit::delete(0, "foo"));
        history.push(Edit::insert(0, "bar"));
        history.end_group();

        assert_eq!(history.undo_count(), 1);
        let group = history.undo().unwrap();
        assert_eq!(group.edits.len(), 4);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_empty_group_records_nothing() {
        let mut history = History::new(100);
        history.begin_group();
        history.end_group();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new(100);
        history.push(Edit::insert(0, "a"));
        history.undo();
        assert!(history.can_redo());

        history.push(Edit::insert(0, "b"));
        assert!(!history.can_redo());
    }
}
