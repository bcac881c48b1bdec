//! Tab groups: the ordered documents shown in one pane.

use std::path::Path;

use crate::document::{Document, DocumentId};
use crate::{CoreError, CoreResult};

/// How a request to close a tab must proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePlan {
    /// The document is unmodified; it may be removed immediately.
    Clean,
    /// The document has unsaved changes; the user must decide first.
    NeedsDecision,
}

/// The user's answer to an unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Save the document, then close the tab.
    Save,
    /// Close the tab, discarding changes.
    Discard,
    /// Keep the tab open.
    Cancel,
}

/// What happened when a close was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed.
    Closed(DocumentId),
    /// The user cancelled; nothing changed.
    Cancelled,
    /// Saving requires a path the document does not have; the caller must
    /// obtain one (save-as) and retry.
    NeedsPath,
}

/// An ordered collection of documents with one active tab.
///
/// Invariant: a modified document is never removed except through
/// [`TabGroup::close_with`] carrying an explicit [`CloseDecision`].
pub struct TabGroup {
    docs: Vec<Document>,
    active: usize,
}

impl TabGroup {
    /// Creates a tab group holding one untitled document.
    pub fn new() -> Self {
        Self {
            docs: vec![Document::new()],
            active: 0,
        }
    }

    /// Number of tabs.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if the group holds no tabs.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Index of the active tab.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// All documents, in tab order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    /// Returns a document by index.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    /// Returns a mutable document by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.docs.get_mut(index)
    }

    /// Returns the active document.
    pub fn active_doc(&self) -> Option<&Document> {
        self.docs.get(self.active)
    }

    /// Returns the active document mutably.
    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        self.docs.get_mut(self.active)
    }

    /// Makes a tab active by index.
    pub fn set_active(&mut self, index: usize) {
        if index < self.docs.len() {
            self.active = index;
        }
    }

    /// Finds the tab index holding a path.
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.docs.iter().position(|d| d.path() == Some(path))
    }

    /// Derived tab title: the display name, marked when unsaved.
    pub fn title(&self, index: usize) -> String {
        match self.docs.get(index) {
            Some(doc) if doc.is_modified() => format!("\u{25CF} {}", doc.name()),
            Some(doc) => doc.name().to_string(),
            None => String::new(),
        }
    }

    /// Appends a new untitled tab and focuses it.
    pub fn new_tab(&mut self) -> DocumentId {
        let doc = Document::new();
        let id = doc.id();
        self.docs.push(doc);
        self.active = self.docs.len() - 1;
        id
    }

    /// Opens a file, reusing tabs where possible.
    ///
    /// Policy, in order: focus an existing tab with this path; load into a
    /// pristine untitled tab; otherwise append a new tab. Calling twice
    /// with the same path therefore never yields two tabs for it.
    pub fn open_or_focus(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let path = path.as_ref();

        if let Some(index) = self.find_by_path(path) {
            self.active = index;
            return Ok(self.docs[index].id());
        }

        let doc = Document::from_file(path)?;
        let id = doc.id();

        if let Some(doc_slot) = self
            .docs
            .get_mut(self.active)
            .filter(|d| d.is_pristine_untitled())
        {
            *doc_slot = doc;
        } else {
            self.docs.push(doc);
            self.active = self.docs.len() - 1;
        }

        Ok(id)
    }

    /// Plans a close: tells the caller whether a decision is required.
    pub fn close_plan(&self, index: usize) -> CoreResult<ClosePlan> {
        let doc = self
            .docs
            .get(index)
            .ok_or(CoreError::NoActiveDocument)?;
        if doc.is_modified() {
            Ok(ClosePlan::NeedsDecision)
        } else {
            Ok(ClosePlan::Clean)
        }
    }

    /// Resolves a close with the user's decision.
    ///
    /// A clean document closes regardless of the decision. Saving a
    /// document that has no path yields [`CloseOutcome::NeedsPath`]; the
    /// tab stays open until the caller supplies one and retries.
    pub fn close_with(
        &mut self,
        index: usize,
        decision: CloseDecision,
    ) -> CoreResult<CloseOutcome> {
        let doc = self
            .docs
            .get_mut(index)
            .ok_or(CoreError::NoActiveDocument)?;

        if doc.is_modified() {
            match decision {
                CloseDecision::Cancel => return Ok(CloseOutcome::Cancelled),
                CloseDecision::Save => {
                    if doc.path().is_none() {
                        return Ok(CloseOutcome::NeedsPath);
                    }
                    doc.save()?;
                }
                CloseDecision::Discard => {}
            }
        }

        let removed = self.docs.remove(index);
        if self.active >= self.docs.len() {
            self.active = self.docs.len().saturating_sub(1);
        } else if index < self.active {
            self.active -= 1;
        }
        Ok(CloseOutcome::Closed(removed.id()))
    }

    /// Cycles to the next tab, wrapping around.
    pub fn next_tab(&mut self) {
        if self.docs.len() > 1 {
            self.active = (self.active + 1) % self.docs.len();
        }
    }

    /// Cycles to the previous tab, wrapping around.
    pub fn previous_tab(&mut self) {
        if self.docs.len() > 1 {
            self.active = (self.active + self.docs.len() - 1) % self.docs.len();
        }
    }
}

impl Default for TabGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_buffer::Position;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_starts_with_one_untitled_tab() {
        let tabs = TabGroup::new();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.title(0), "Untitled");
    }

    #[test]
    fn test_open_or_focus_reuses_pristine_untitled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "hello");

        let mut tabs = TabGroup::new();
        tabs.open_or_focus(&path).unwrap();

        // The pristine untitled tab was replaced, not joined
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.title(0), "a.txt");
    }

    #[test]
    fn test_open_same_path_twice_yields_one_tab() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.txt", "aaa");
        let b = write_file(&dir, "b.txt", "bbb");

        let mut tabs = TabGroup::new();
        let first = tabs.open_or_focus(&a).unwrap();
        tabs.open_or_focus(&b).unwrap();
        let again = tabs.open_or_focus(&a).unwrap();

        assert_eq!(first, again);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_index(), tabs.find_by_path(&a).unwrap());
    }

    #[test]
    fn test_open_does_not_reuse_modified_untitled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "hello");

        let mut tabs = TabGroup::new();
        tabs.active_doc_mut()
            .unwrap()
            .insert_at_cursor("draft")
            .unwrap();
        tabs.open_or_focus(&path).unwrap();

        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn test_title_marks_modified() {
        let mut tabs = TabGroup::new();
        tabs.active_doc_mut()
            .unwrap()
            .insert_at_cursor("x")
            .unwrap();
        assert_eq!(tabs.title(0), "\u{25CF} Untitled");
    }

    #[test]
    fn test_close_clean_tab() {
        let mut tabs = TabGroup::new();
        tabs.new_tab();
        assert_eq!(tabs.len(), 2);

        assert_eq!(tabs.close_plan(0).unwrap(), ClosePlan::Clean);
        let outcome = tabs.close_with(0, CloseDecision::Discard).unwrap();
        assert!(matches!(outcome, CloseOutcome::Closed(_)));
        assert_eq!(tabs.len(), 1);
    }

    #[test]
    fn test_modified_tab_requires_decision_and_cancel_keeps_it() {
        let mut tabs = TabGroup::new();
        tabs.active_doc_mut()
            .unwrap()
            .insert_at_cursor("unsaved")
            .unwrap();

        assert_eq!(tabs.close_plan(0).unwrap(), ClosePlan::NeedsDecision);
        let outcome = tabs.close_with(0, CloseDecision::Cancel).unwrap();
        assert_eq!(outcome, CloseOutcome::Cancelled);
        assert_eq!(tabs.len(), 1);
    }

    #[test]
    fn test_close_save_without_path_needs_path() {
        let mut tabs = TabGroup::new();
        tabs.active_doc_mut()
            .unwrap()
            .insert_at_cursor("unsaved")
            .unwrap();

        let outcome = tabs.close_with(0, CloseDecision::Save).unwrap();
        assert_eq!(outcome, CloseOutcome::NeedsPath);
        assert_eq!(tabs.len(), 1);
    }

    #[test]
    fn test_close_save_writes_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "old");

        let mut tabs = TabGroup::new();
        tabs.open_or_focus(&path).unwrap();
        let doc = tabs.active_doc_mut().unwrap();
        doc.set_cursor(Position::new(0, 3));
        doc.insert_at_cursor("!").unwrap();

        let outcome = tabs.close_with(0, CloseDecision::Save).unwrap();
        assert!(matches!(outcome, CloseOutcome::Closed(_)));
        assert!(tabs.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old!");
    }

    #[test]
    fn test_close_adjusts_active_index() {
        let mut tabs = TabGroup::new();
        tabs.new_tab();
        tabs.new_tab();
        tabs.set_active(2);

        tabs.close_with(2, CloseDecision::Discard).unwrap();
        assert_eq!(tabs.active_index(), 1);

        tabs.set_active(1);
        tabs.close_with(0, CloseDecision::Discard).unwrap();
        assert_eq!(tabs.active_index(), 0);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut tabs = TabGroup::new();
        tabs.new_tab();
        tabs.new_tab();
        tabs.set_active(2);

        tabs.next_tab();
        assert_eq!(tabs.active_index(), 0);
        tabs.previous_tab();
        assert_eq!(tabs.active_index(), 2);
    }
}
