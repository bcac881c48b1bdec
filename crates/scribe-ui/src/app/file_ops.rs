//! Keeping widget contents in sync with the document model.
//!
//! Each open document has one `text_editor::Content` mirroring it.
//! Keystrokes flow view-to-model (`sync_text` after an edit action);
//! model-driven operations (line ops, find, replace, undo) flow
//! model-to-view by rebuilding the content and reseating the cursor.

use std::collections::HashSet;
use std::path::Path;

use iced::widget::text_editor::{self, Action, Motion};

use scribe_core::{Document, DocumentId};

use super::{App, Message};

impl App {
    /// Creates contents for new documents and drops stale ones.
    pub fn sync_contents(&mut self) {
        let ids: HashSet<DocumentId> = self
            .editor
            .split_tree()
            .panes()
            .iter()
            .flat_map(|p| p.tabs.iter().map(|d| d.id()))
            .collect();

        self.contents.retain(|id, _| ids.contains(id));
        for id in ids {
            if !self.contents.contains_key(&id) {
                self.refresh_view(id);
            }
        }
    }

    /// Rebuilds a document's widget content from the model, reseating the
    /// cursor and selection.
    pub fn refresh_view(&mut self, id: DocumentId) {
        let content = match self.editor.doc(id) {
            Some(doc) => {
                let mut content = text_editor::Content::with_text(&doc.text());
                Self::apply_model_cursor(&mut content, doc);
                content
            }
            None => return,
        };
        self.contents.insert(id, content);
    }

    /// Rebuilds the widget content of the active document.
    pub fn refresh_active_view(&mut self) {
        if let Some(id) = self.editor.active_doc().map(|d| d.id()) {
            self.refresh_view(id);
        }
    }

    /// Moves the widget cursor to the model's cursor, re-creating the
    /// model's selection character by character.
    fn apply_model_cursor(content: &mut text_editor::Content, doc: &Document) {
        match doc.cursor().selection_range() {
            Some((start, end)) => {
                Self::seat_cursor(content, start.line, start.column);
                let start_idx = doc.buffer().position_to_char_idx(start).unwrap_or(0);
                let end_idx = doc
                    .buffer()
                    .position_to_char_idx(end)
                    .unwrap_or(start_idx);
                for _ in start_idx..end_idx {
                    content.perform(Action::Select(Motion::Right));
                }
            }
            None => {
                let pos = doc.cursor_position();
                Self::seat_cursor(content, pos.line, pos.column);
            }
        }
    }

    /// Seats the widget cursor at a line and column via cursor motions.
    pub fn seat_cursor(content: &mut text_editor::Content, line: usize, column: usize) {
        content.perform(Action::Move(Motion::DocumentStart));
        for _ in 0..line {
            content.perform(Action::Move(Motion::Down));
        }
        for _ in 0..column {
            content.perform(Action::Move(Motion::Right));
        }
    }

    /// Opens a path in the active pane and surfaces any failure.
    pub fn open_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match self.editor.open_file(path) {
            Ok(_) => {
                self.sync_contents();
                self.status_message = format!("Opened: {}", name);
            }
            Err(e) => {
                tracing::warn!("failed to open {}: {}", path.display(), e);
                self.error_message = Some(format!("Could not open file \"{}\": {}", name, e));
            }
        }
    }

    /// Builds the async file-open dialog task.
    pub fn pick_file_task() -> iced::Task<Message> {
        iced::Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .add_filter("All Files", &["*"])
                    .pick_file()
                    .await
                    .map(|file| file.path().to_path_buf())
            },
            Message::FileChosen,
        )
    }

    /// Builds the async folder-open dialog task.
    pub fn pick_folder_task() -> iced::Task<Message> {
        iced::Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .pick_folder()
                    .await
                    .map(|folder| folder.path().to_path_buf())
            },
            Message::FolderChosen,
        )
    }

    /// Builds the async save-as dialog task.
    pub fn save_file_task(&self) -> iced::Task<Message> {
        let default_name = self
            .editor
            .active_doc()
            .map(|d| d.name().to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        iced::Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .set_file_name(&default_name)
                    .save_file()
                    .await
                    .map(|file| file.path().to_path_buf())
            },
            Message::SavePathChosen,
        )
    }
}
