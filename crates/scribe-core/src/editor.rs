//! The editor facade.
//!
//! `Editor` owns the split tree, the find bar state, the workspace, the
//! configuration and the event bus, and routes every file, tab and search
//! operation to the active pane's active document. UI code talks to this
//! type; it never reaches around it to mutate documents directly.

use std::path::Path;

use crate::config::Config;
use crate::document::{Document, DocumentId};
use crate::event::{EditorEvent, EventBus};
use crate::find::FindState;
use crate::keymap::Keymap;
use crate::split::{Orientation, Pane, PaneId, SplitTree};
use crate::tabs::{CloseDecision, CloseOutcome, ClosePlan};
use crate::workspace::Workspace;
use crate::{CoreError, CoreResult};

/// The main editor state.
///
/// Owned by the UI thread; every method runs synchronously and emits
/// events describing what changed.
pub struct Editor {
    /// Pane layout and documents
    split: SplitTree,

    /// Find/replace bar state
    find: FindState,

    /// Current workspace folder, if any
    workspace: Option<Workspace>,

    /// Editor configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Event bus for notifications
    event_bus: EventBus,

    /// Whether the editor should quit
    should_quit: bool,
}

impl Editor {
    /// Creates an editor with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let keymap = Keymap::from_config(&config);
        Self {
            split: SplitTree::new(),
            find: FindState::new(),
            workspace: None,
            config,
            keymap,
            event_bus: EventBus::new(),
            should_quit: false,
        }
    }

    // ==================== Panes ====================

    /// Returns the split tree for rendering.
    pub fn split_tree(&self) -> &SplitTree {
        &self.split
    }

    /// ID of the active pane.
    pub fn active_pane_id(&self) -> PaneId {
        self.split.active_id()
    }

    /// Returns a pane by ID, mutably.
    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.split.pane_mut(id)
    }

    /// Makes a pane the target of file, save and find operations.
    pub fn focus_pane(&mut self, id: PaneId) {
        self.split.set_active(id);
        self.emit(EditorEvent::PaneFocused(self.split.active_id()));
    }

    /// Splits the active pane; the fresh pane becomes active.
    pub fn split_pane(&mut self, orientation: Orientation) -> PaneId {
        let id = self.split.split(orientation);
        self.emit(EditorEvent::PaneSplit(id));
        self.emit(EditorEvent::PaneFocused(id));
        id
    }

    /// Closes a pane outright. The caller is responsible for having
    /// resolved unsaved documents first (see [`Editor::close_tab`]).
    pub fn close_pane(&mut self, id: PaneId) -> CoreResult<()> {
        self.split.close_pane(id)?;
        self.emit(EditorEvent::PaneClosed(id));
        self.emit(EditorEvent::PaneFocused(self.split.active_id()));
        Ok(())
    }

    /// Focuses the next pane in layout order.
    pub fn focus_next_pane(&mut self) {
        self.split.focus_next();
        self.emit(EditorEvent::PaneFocused(self.split.active_id()));
    }

    /// Focuses the previous pane in layout order.
    pub fn focus_previous_pane(&mut self) {
        self.split.focus_previous();
        self.emit(EditorEvent::PaneFocused(self.split.active_id()));
    }

    // ==================== Documents ====================

    /// Returns the active document.
    pub fn active_doc(&self) -> Option<&Document> {
        self.split.active_pane().and_then(|p| p.tabs.active_doc())
    }

    /// Returns the active document, mutably.
    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        self.split
            .active_pane_mut()
            .and_then(|p| p.tabs.active_doc_mut())
    }

    fn require_active_doc(&mut self) -> CoreResult<&mut Document> {
        self.active_doc_mut().ok_or(CoreError::NoActiveDocument)
    }

    /// Finds a document in any pane.
    pub fn doc(&self, id: DocumentId) -> Option<&Document> {
        self.split
            .panes()
            .into_iter()
            .flat_map(|p| p.tabs.iter())
            .find(|d| d.id() == id)
    }

    /// Opens a file in the active pane, reusing an existing or pristine
    /// untitled tab per the tab group's policy.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let pane = self
            .split
            .active_pane_mut()
            .ok_or(CoreError::PaneNotFound)?;
        let id = pane.tabs.open_or_focus(path)?;
        self.emit(EditorEvent::DocumentOpened(id));
        Ok(id)
    }

    /// Creates a new untitled tab in the active pane.
    pub fn new_document(&mut self) -> CoreResult<DocumentId> {
        let pane = self
            .split
            .active_pane_mut()
            .ok_or(CoreError::PaneNotFound)?;
        let id = pane.tabs.new_tab();
        self.emit(EditorEvent::DocumentOpened(id));
        Ok(id)
    }

    /// Saves the active document to its known path.
    pub fn save_active(&mut self) -> CoreResult<DocumentId> {
        let doc = self.require_active_doc()?;
        doc.save()?;
        let id = doc.id();
        self.emit(EditorEvent::DocumentSaved(id));
        Ok(id)
    }

    /// Saves the active document to a new path.
    pub fn save_active_as(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let doc = self.require_active_doc()?;
        doc.save_as(path)?;
        let id = doc.id();
        self.emit(EditorEvent::DocumentSaved(id));
        Ok(id)
    }

    // ==================== Tabs ====================

    /// Plans a tab close: tells the caller whether the user must decide.
    pub fn close_tab_plan(&self, pane: PaneId, index: usize) -> CoreResult<ClosePlan> {
        self.split
            .pane(pane)
            .ok_or(CoreError::PaneNotFound)?
            .tabs
            .close_plan(index)
    }

    /// Resolves a tab close with the user's decision.
    ///
    /// When the last tab of a pane closes, the pane itself closes (or, for
    /// the last pane, re-grows a fresh untitled tab so an editor is always
    /// showing).
    pub fn close_tab(
        &mut self,
        pane: PaneId,
        index: usize,
        decision: CloseDecision,
    ) -> CoreResult<CloseOutcome> {
        let group = &mut self
            .split
            .pane_mut(pane)
            .ok_or(CoreError::PaneNotFound)?
            .tabs;
        let outcome = group.close_with(index, decision)?;

        if let CloseOutcome::Closed(id) = outcome {
            let now_empty = group.is_empty();
            self.emit(EditorEvent::DocumentClosed(id));

            if now_empty {
                if self.split.pane_count() > 1 {
                    self.close_pane(pane)?;
                } else if let Some(p) = self.split.pane_mut(pane) {
                    p.tabs.new_tab();
                }
            }
        }
        Ok(outcome)
    }

    /// Cycles to the next tab of the active pane.
    pub fn next_tab(&mut self) {
        if let Some(pane) = self.split.active_pane_mut() {
            pane.tabs.next_tab();
        }
    }

    /// Cycles to the previous tab of the active pane.
    pub fn previous_tab(&mut self) {
        if let Some(pane) = self.split.active_pane_mut() {
            pane.tabs.previous_tab();
        }
    }

    // ==================== Editing ====================

    /// Undoes the last edit in the active document.
    pub fn undo(&mut self) -> CoreResult<()> {
        let doc = self.require_active_doc()?;
        doc.undo()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Redoes the last undone edit in the active document.
    pub fn redo(&mut self) -> CoreResult<()> {
        let doc = self.require_active_doc()?;
        doc.redo()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Duplicates the current line of the active document.
    pub fn duplicate_line(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.duplicate_line()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Deletes the current line of the active document.
    pub fn delete_line(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.delete_line()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Moves the current line up.
    pub fn move_line_up(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.move_line_up()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Moves the current line down.
    pub fn move_line_down(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.move_line_down()?;
        self.emit_document_changed();
        Ok(())
    }

    /// Selects the word under the cursor.
    pub fn select_word(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.select_word();
        Ok(())
    }

    /// Selects the current line.
    pub fn select_line(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.select_line();
        Ok(())
    }

    /// Selects all text.
    pub fn select_all(&mut self) -> CoreResult<()> {
        self.require_active_doc()?.select_all();
        Ok(())
    }

    /// Moves the cursor to a 0-indexed line.
    pub fn go_to_line(&mut self, line: usize) -> CoreResult<()> {
        let doc = self.require_active_doc()?;
        doc.go_to_line(line);
        let id = doc.id();
        self.emit(EditorEvent::CursorMoved(id));
        Ok(())
    }

    // ==================== Find/Replace ====================

    /// Returns the find bar state.
    pub fn find(&self) -> &FindState {
        &self.find
    }

    /// Returns the find bar state, mutably.
    pub fn find_mut(&mut self) -> &mut FindState {
        &mut self.find
    }

    /// Opens the find bar, seeding the query from the active selection.
    pub fn open_find(&mut self) {
        if let Some(doc) = self.split.active_pane().and_then(|p| p.tabs.active_doc()) {
            self.find.open_for(doc);
        } else {
            self.find.open = true;
        }
    }

    /// Closes the find bar.
    pub fn close_find(&mut self) {
        self.find.close();
    }

    /// Selects the next match in the active document.
    pub fn find_next(&mut self) -> bool {
        match self.split.active_pane_mut().and_then(|p| p.tabs.active_doc_mut()) {
            Some(doc) => self.find.find_next(doc),
            None => false,
        }
    }

    /// Selects the previous match in the active document.
    pub fn find_previous(&mut self) -> bool {
        match self.split.active_pane_mut().and_then(|p| p.tabs.active_doc_mut()) {
            Some(doc) => self.find.find_previous(doc),
            None => false,
        }
    }

    /// Replaces the current match and advances.
    pub fn replace_current(&mut self) -> CoreResult<bool> {
        let find = &self.find;
        match self.split.active_pane_mut().and_then(|p| p.tabs.active_doc_mut()) {
            Some(doc) => {
                let advanced = find.replace_current(doc)?;
                self.emit_document_changed();
                Ok(advanced)
            }
            None => Ok(false),
        }
    }

    /// Replaces every match in the active document; returns the count.
    pub fn replace_all(&mut self) -> CoreResult<usize> {
        let find = &self.find;
        match self.split.active_pane_mut().and_then(|p| p.tabs.active_doc_mut()) {
            Some(doc) => {
                let count = find.replace_all(doc)?;
                if count > 0 {
                    self.emit_document_changed();
                }
                Ok(count)
            }
            None => Ok(0),
        }
    }

    /// Number of matches in the active document.
    pub fn match_count(&self) -> usize {
        self.active_doc()
            .map(|doc| self.find.match_count(doc))
            .unwrap_or(0)
    }

    // ==================== Workspace ====================

    /// Opens a workspace folder for the file tree panel.
    pub fn open_workspace(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        self.workspace = Some(Workspace::open(path)?);
        self.emit(EditorEvent::WorkspaceOpened);
        Ok(())
    }

    /// Returns the current workspace.
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Returns the current workspace, mutably.
    pub fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.workspace.as_mut()
    }

    // ==================== Configuration ====================

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration and rebuilds the keymap from it.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.keymap = Keymap::from_config(&self.config);
        self.emit(EditorEvent::ConfigChanged);
    }

    /// Returns the keymap.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // ==================== Lifecycle ====================

    /// Signals that the editor should quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
        self.emit(EditorEvent::Quit);
    }

    /// Returns true if the editor should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns true if any document has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.split
            .panes()
            .iter()
            .any(|p| p.tabs.iter().any(|d| d.is_modified()))
    }

    /// Locates the first modified document, for the quit flow.
    pub fn first_modified(&self) -> Option<(PaneId, usize)> {
        for pane in self.split.panes() {
            for (index, doc) in pane.tabs.iter().enumerate() {
                if doc.is_modified() {
                    return Some((pane.id(), index));
                }
            }
        }
        None
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }

    fn emit_document_changed(&self) {
        if let Some(doc) = self.active_doc() {
            self.emit(EditorEvent::DocumentChanged(doc.id()));
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_routes_to_active_pane() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.txt", "aaa");
        let b = write_file(&dir, "b.txt", "bbb");

        let mut editor = Editor::new();
        let left = editor.active_pane_id();
        editor.open_file(&a).unwrap();

        let right = editor.split_pane(Orientation::Horizontal);
        editor.open_file(&b).unwrap();

        let panes = editor.split_tree().panes();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[0].id(), left);
        assert!(panes[0].tabs.find_by_path(&a).is_some());
        assert!(panes[1].tabs.find_by_path(&b).is_some());
        assert_eq!(editor.active_pane_id(), right);
    }

    #[test]
    fn test_open_same_file_twice_keeps_one_tab() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.txt", "aaa");

        let mut editor = Editor::new();
        let first = editor.open_file(&a).unwrap();
        let second = editor.open_file(&a).unwrap();
        assert_eq!(first, second);
        assert_eq!(editor.split_tree().panes()[0].tabs.len(), 1);
    }

    #[test]
    fn test_close_last_tab_of_pane_closes_pane() {
        let mut editor = Editor::new();
        let original = editor.active_pane_id();
        let extra = editor.split_pane(Orientation::Vertical);

        let outcome = editor.close_tab(extra, 0, CloseDecision::Discard).unwrap();
        assert!(matches!(outcome, CloseOutcome::Closed(_)));
        assert_eq!(editor.split_tree().pane_count(), 1);
        assert_eq!(editor.active_pane_id(), original);
    }

    #[test]
    fn test_close_last_tab_of_last_pane_regrows_untitled() {
        let mut editor = Editor::new();
        let pane = editor.active_pane_id();

        editor.close_tab(pane, 0, CloseDecision::Discard).unwrap();
        assert_eq!(editor.split_tree().pane_count(), 1);
        let tabs = &editor.split_tree().panes()[0].tabs;
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.title(0), "Untitled");
    }

    #[test]
    fn test_modified_tab_survives_cancel() {
        let mut editor = Editor::new();
        let pane = editor.active_pane_id();
        editor
            .active_doc_mut()
            .unwrap()
            .insert_at_cursor("unsaved")
            .unwrap();

        assert_eq!(
            editor.close_tab_plan(pane, 0).unwrap(),
            ClosePlan::NeedsDecision
        );
        let outcome = editor.close_tab(pane, 0, CloseDecision::Cancel).unwrap();
        assert_eq!(outcome, CloseOutcome::Cancelled);
        assert!(editor.active_doc().unwrap().is_modified());
    }

    #[test]
    fn test_find_targets_active_pane() {
        let mut editor = Editor::new();
        editor
            .active_doc_mut()
            .unwrap()
            .insert_at_cursor("needle in a haystack")
            .unwrap();

        let other = editor.split_pane(Orientation::Horizontal);
        assert_eq!(editor.active_pane_id(), other);

        editor.find_mut().query = "needle".to_string();
        // Active pane holds an empty untitled document
        assert!(!editor.find_next());
        assert_eq!(editor.match_count(), 0);

        editor.focus_previous_pane();
        assert!(editor.find_next());
        assert_eq!(editor.match_count(), 1);
    }

    #[test]
    fn test_quit_scan_finds_modified_docs() {
        let mut editor = Editor::new();
        assert!(editor.first_modified().is_none());

        editor
            .active_doc_mut()
            .unwrap()
            .insert_at_cursor("dirty")
            .unwrap();
        let (pane, index) = editor.first_modified().unwrap();
        assert_eq!(pane, editor.active_pane_id());
        assert_eq!(index, 0);
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_go_to_line_moves_cursor() {
        let mut editor = Editor::new();
        editor
            .active_doc_mut()
            .unwrap()
            .insert_at_cursor("a\nb\nc")
            .unwrap();

        editor.go_to_line(1).unwrap();
        assert_eq!(editor.active_doc().unwrap().cursor_position().line, 1);
    }

    #[test]
    fn test_open_from_workspace_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("script.py"), "print('Hello')").unwrap();

        let mut editor = Editor::new();
        editor.open_workspace(dir.path()).unwrap();

        let path = editor.workspace().unwrap().tree().children[0].path.clone();
        editor.open_file(&path).unwrap();
        assert!(editor.active_doc().unwrap().text().contains("Hello"));

        // The file opened from the tree is searchable like any other
        editor.find_mut().query = "hello".to_string();
        assert!(editor.find_next());
    }

    #[test]
    fn test_set_config_rebuilds_keymap() {
        use crate::keymap::KeyPress;

        let mut editor = Editor::new();
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("ctrl+m".to_string(), "move_line_down".to_string());

        editor.set_config(config);
        assert_eq!(
            editor.keymap().lookup(&KeyPress::parse("ctrl+m").unwrap()),
            Some(crate::command::Command::MoveLineDown)
        );
    }

    #[test]
    fn test_events_emitted_on_open() {
        let mut editor = Editor::new();
        let mut rx = editor.subscribe();

        editor.new_document().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(EditorEvent::DocumentOpened(_))
        ));
    }
}
