use std::sync::Arc;

use iced::widget::text_editor::{self, Action};
use iced::{keyboard, Task};

use scribe_buffer::{BufferError, Position};
use scribe_core::keymap::{Key as CoreKey, KeyPress, Modifiers as CoreModifiers};
use scribe_core::{
    CloseDecision, CloseOutcome, ClosePlan, Command, CoreError, Orientation, PaneId,
};

use super::{AfterClose, App, Message, PendingClose};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ==================== File ====================
            Message::NewTab => {
                self.active_menu = None;
                match self.editor.new_document() {
                    Ok(_) => {
                        self.sync_contents();
                        self.status_message = "New file created".to_string();
                    }
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
            }

            Message::OpenFileDialog => {
                self.active_menu = None;
                return Self::pick_file_task();
            }

            Message::OpenFolderDialog => {
                self.active_menu = None;
                return Self::pick_folder_task();
            }

            Message::FileChosen(path) => {
                if let Some(path) = path {
                    self.open_path(&path);
                }
            }

            Message::FolderChosen(path) => {
                if let Some(path) = path {
                    match self.editor.open_workspace(&path) {
                        Ok(()) => {
                            self.sidebar_visible = true;
                            self.status_message = format!(
                                "Opened folder: {}",
                                self.editor
                                    .workspace()
                                    .map(|w| w.name().to_string())
                                    .unwrap_or_default()
                            );
                        }
                        Err(e) => {
                            self.error_message =
                                Some(format!("Could not open folder: {}", e));
                        }
                    }
                }
            }

            Message::Save => {
                self.active_menu = None;
                match self.editor.save_active() {
                    Ok(_) => {
                        let name = self
                            .editor
                            .active_doc()
                            .map(|d| d.name().to_string())
                            .unwrap_or_default();
                        self.status_message = format!("Saved: {}", name);
                    }
                    Err(CoreError::Buffer(BufferError::NoFilePath)) => {
                        return self.update(Message::SaveAs);
                    }
                    Err(e) => {
                        self.error_message = Some(format!("Save failed: {}", e));
                    }
                }
            }

            Message::SaveAs => {
                self.active_menu = None;
                return self.save_file_task();
            }

            Message::SavePathChosen(path) => match path {
                Some(path) => match self.editor.save_active_as(&path) {
                    Ok(_) => {
                        let name = self
                            .editor
                            .active_doc()
                            .map(|d| d.name().to_string())
                            .unwrap_or_default();
                        self.status_message = format!("Saved: {}", name);
                        if self.pending_close.is_some() {
                            // A close was waiting on this path
                            return self.resolve_pending(CloseDecision::Save);
                        }
                    }
                    Err(e) => {
                        self.error_message = Some(format!("Save failed: {}", e));
                    }
                },
                None => {
                    if self.pending_close.is_some() {
                        self.pending_close = None;
                        self.status_message = "Close cancelled".to_string();
                    }
                }
            },

            // ==================== Tabs ====================
            Message::TabSelected(pane, index) => {
                self.active_menu = None;
                self.editor.focus_pane(pane);
                if let Some(p) = self.editor.pane_mut(pane) {
                    p.tabs.set_active(index);
                }
            }

            Message::CloseTab(pane, index) => {
                return self.request_close_tab(pane, index, AfterClose::Nothing);
            }

            Message::CloseActiveTab => {
                self.active_menu = None;
                let pane = self.editor.active_pane_id();
                let index = self
                    .editor
                    .split_tree()
                    .active_pane()
                    .map(|p| p.tabs.active_index());
                if let Some(index) = index {
                    return self.request_close_tab(pane, index, AfterClose::Nothing);
                }
            }

            Message::NextTab => {
                self.active_menu = None;
                self.editor.next_tab();
            }

            Message::PrevTab => {
                self.active_menu = None;
                self.editor.previous_tab();
            }

            // ==================== Editor widget ====================
            Message::EditorAction(pane, action) => {
                self.active_menu = None;
                if self.editor.active_pane_id() != pane {
                    self.editor.focus_pane(pane);
                }
                let is_edit = action.is_edit();
                self.perform_on_pane(pane, action, is_edit);
            }

            // ==================== Edit ====================
            Message::Undo => {
                self.active_menu = None;
                match self.editor.undo() {
                    Ok(()) => {
                        self.refresh_active_view();
                        self.status_message = "Undo".to_string();
                    }
                    Err(_) => self.status_message = "Nothing to undo".to_string(),
                }
            }

            Message::Redo => {
                self.active_menu = None;
                match self.editor.redo() {
                    Ok(()) => {
                        self.refresh_active_view();
                        self.status_message = "Redo".to_string();
                    }
                    Err(_) => self.status_message = "Nothing to redo".to_string(),
                }
            }

            Message::Cut => {
                self.active_menu = None;
                let pane = self.editor.active_pane_id();
                if let Some(selected) = self.active_selection() {
                    self.set_clipboard(&selected);
                    self.status_message = "Cut".to_string();
                    return self.update(Message::EditorAction(
                        pane,
                        Action::Edit(text_editor::Edit::Delete),
                    ));
                }
                self.status_message = "Nothing selected".to_string();
            }

            Message::Copy => {
                self.active_menu = None;
                match self.active_selection() {
                    Some(selected) => {
                        self.set_clipboard(&selected);
                        self.status_message = "Copied".to_string();
                    }
                    None => self.status_message = "Nothing selected".to_string(),
                }
            }

            Message::Paste => {
                self.active_menu = None;
                let pane = self.editor.active_pane_id();
                if let Some(text) = self.get_clipboard() {
                    self.status_message = "Pasted".to_string();
                    return self.update(Message::EditorAction(
                        pane,
                        Action::Edit(text_editor::Edit::Paste(Arc::new(text))),
                    ));
                }
            }

            // ==================== Selection ====================
            Message::SelectAll => {
                self.active_menu = None;
                let _ = self.editor.select_all();
                self.refresh_active_view();
            }

            Message::SelectWord => {
                self.active_menu = None;
                let _ = self.editor.select_word();
                self.refresh_active_view();
            }

            Message::SelectLine => {
                self.active_menu = None;
                let _ = self.editor.select_line();
                self.refresh_active_view();
            }

            // ==================== Line operations ====================
            Message::DuplicateLine => {
                self.active_menu = None;
                if self.editor.duplicate_line().is_ok() {
                    self.refresh_active_view();
                }
            }

            Message::DeleteLine => {
                self.active_menu = None;
                if self.editor.delete_line().is_ok() {
                    self.refresh_active_view();
                }
            }

            Message::MoveLineUp => {
                self.active_menu = None;
                if self.editor.move_line_up().is_ok() {
                    self.refresh_active_view();
                }
            }

            Message::MoveLineDown => {
                self.active_menu = None;
                if self.editor.move_line_down().is_ok() {
                    self.refresh_active_view();
                }
            }

            // ==================== Splits ====================
            Message::SplitRight => {
                self.active_menu = None;
                self.editor.split_pane(Orientation::Horizontal);
                self.sync_contents();
                self.status_message = "Split right".to_string();
            }

            Message::SplitDown => {
                self.active_menu = None;
                self.editor.split_pane(Orientation::Vertical);
                self.sync_contents();
                self.status_message = "Split down".to_string();
            }

            Message::CloseSplit => {
                self.active_menu = None;
                let pane = self.editor.active_pane_id();
                return self.attempt_close_pane(pane);
            }

            Message::FocusNextSplit => {
                self.active_menu = None;
                self.editor.focus_next_pane();
            }

            Message::FocusPreviousSplit => {
                self.active_menu = None;
                self.editor.focus_previous_pane();
            }

            // ==================== Find/replace ====================
            Message::ShowFind => {
                self.active_menu = None;
                self.editor.open_find();
            }

            Message::CloseFind => {
                self.editor.close_find();
            }

            Message::FindQueryChanged(query) => {
                self.editor.find_mut().query = query;
                // Re-run the search from the top so the first match lights up
                if !self.editor.find().query.is_empty() {
                    if let Some(doc) = self.editor.active_doc_mut() {
                        doc.set_cursor(Position::ZERO);
                    }
                    if self.editor.find_next() {
                        self.refresh_active_view();
                    }
                }
            }

            Message::ReplacementChanged(replacement) => {
                self.editor.find_mut().replacement = replacement;
            }

            Message::ToggleCaseSensitive(value) => {
                self.editor.find_mut().case_sensitive = value;
            }

            Message::ToggleWholeWord(value) => {
                self.editor.find_mut().whole_word = value;
            }

            Message::FindNext => {
                if self.editor.find_next() {
                    self.refresh_active_view();
                } else {
                    self.status_message = "No matches".to_string();
                }
            }

            Message::FindPrevious => {
                if self.editor.find_previous() {
                    self.refresh_active_view();
                } else {
                    self.status_message = "No matches".to_string();
                }
            }

            Message::Replace => match self.editor.replace_current() {
                Ok(_) => self.refresh_active_view(),
                Err(e) => self.status_message = format!("Error: {}", e),
            },

            Message::ReplaceAll => match self.editor.replace_all() {
                Ok(count) => {
                    self.refresh_active_view();
                    self.status_message = format!("Replaced {} occurrences", count);
                }
                Err(e) => self.status_message = format!("Error: {}", e),
            },

            // ==================== Sidebar ====================
            Message::ToggleSidebar => {
                self.active_menu = None;
                self.sidebar_visible = !self.sidebar_visible;
            }

            Message::FileClicked(path) => {
                self.open_path(&path);
            }

            Message::ToggleFolder(path) => {
                if let Some(ws) = self.editor.workspace_mut() {
                    ws.toggle_folder(&path);
                }
            }

            // ==================== Unsaved-changes decisions ====================
            Message::ConfirmSave => return self.resolve_pending(CloseDecision::Save),
            Message::ConfirmDiscard => return self.resolve_pending(CloseDecision::Discard),
            Message::ConfirmCancel => return self.resolve_pending(CloseDecision::Cancel),

            // ==================== Go to line ====================
            Message::ShowGotoLine => {
                self.active_menu = None;
                self.goto_line_visible = true;
                self.goto_line_input = String::new();
            }

            Message::GotoLineInputChanged(value) => {
                self.goto_line_input = value;
            }

            Message::GotoLineConfirm => {
                self.goto_line_visible = false;
                if let Ok(line) = self.goto_line_input.trim().parse::<usize>() {
                    if line > 0 && self.editor.go_to_line(line - 1).is_ok() {
                        self.refresh_active_view();
                        self.status_message = format!("Go to line {}", line);
                    }
                }
            }

            Message::GotoLineCancel => {
                self.goto_line_visible = false;
            }

            // ==================== Dialogs ====================
            Message::ShowAbout => {
                self.active_menu = None;
                self.about_visible = true;
            }

            Message::HideAbout => {
                self.about_visible = false;
            }

            Message::DismissError => {
                self.error_message = None;
            }

            // ==================== Menu bar ====================
            Message::ToggleTopMenu(menu) => {
                if self.active_menu == Some(menu) {
                    self.active_menu = None;
                } else {
                    self.active_menu = Some(menu);
                }
            }

            Message::CloseTopMenu => {
                self.active_menu = None;
            }

            // ==================== Keyboard ====================
            Message::KeyPressed(key, modifiers) => {
                return self.handle_key_pressed(key, modifiers);
            }

            // ==================== Window ====================
            Message::CloseWindow => {
                self.active_menu = None;
                match self.editor.first_modified() {
                    None => {
                        self.editor.quit();
                        return iced::exit();
                    }
                    Some((pane, index)) => {
                        return self.request_close_tab(pane, index, AfterClose::Quit);
                    }
                }
            }
        }
        Task::none()
    }

    // ==================== Close protocol ====================

    /// Starts closing a tab: clean tabs close at once, modified tabs raise
    /// the save/discard/cancel dialog. `then` is resumed after the close.
    fn request_close_tab(
        &mut self,
        pane: PaneId,
        index: usize,
        then: AfterClose,
    ) -> Task<Message> {
        self.active_menu = None;
        match self.editor.close_tab_plan(pane, index) {
            Ok(ClosePlan::Clean) => {
                match self.editor.close_tab(pane, index, CloseDecision::Discard) {
                    Ok(_) => {
                        self.sync_contents();
                        self.status_message = "Tab closed".to_string();
                        return self.after_close(then, pane);
                    }
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
            }
            Ok(ClosePlan::NeedsDecision) => {
                // Bring the tab into view so the user sees what they are
                // deciding about
                self.editor.focus_pane(pane);
                if let Some(p) = self.editor.pane_mut(pane) {
                    p.tabs.set_active(index);
                }
                self.pending_close = Some(PendingClose { pane, index, then });
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
        Task::none()
    }

    /// Applies the user's decision to the pending close.
    fn resolve_pending(&mut self, decision: CloseDecision) -> Task<Message> {
        let Some(pending) = self.pending_close else {
            return Task::none();
        };

        if decision == CloseDecision::Cancel {
            self.pending_close = None;
            self.status_message = "Close cancelled".to_string();
            return Task::none();
        }

        match self.editor.close_tab(pending.pane, pending.index, decision) {
            Ok(CloseOutcome::Closed(_)) => {
                self.pending_close = None;
                self.sync_contents();
                self.status_message = "Tab closed".to_string();
                return self.after_close(pending.then, pending.pane);
            }
            Ok(CloseOutcome::NeedsPath) => {
                // Keep the pending close; finish it once a path is chosen
                return self.save_file_task();
            }
            Ok(CloseOutcome::Cancelled) => {
                self.pending_close = None;
            }
            Err(e) => {
                self.pending_close = None;
                self.error_message = Some(format!("Save failed: {}", e));
            }
        }
        Task::none()
    }

    fn after_close(&mut self, then: AfterClose, pane: PaneId) -> Task<Message> {
        match then {
            AfterClose::Nothing => Task::none(),
            AfterClose::CloseSplit => self.attempt_close_pane(pane),
            AfterClose::Quit => self.update(Message::CloseWindow),
        }
    }

    /// Closes a pane, walking its modified tabs through the decision
    /// dialog one at a time.
    fn attempt_close_pane(&mut self, pane: PaneId) -> Task<Message> {
        if self.editor.split_tree().pane(pane).is_none() {
            // Closing its last tab already collapsed the pane
            return Task::none();
        }
        if self.editor.split_tree().pane_count() <= 1 {
            self.status_message = "Cannot close the only pane".to_string();
            return Task::none();
        }

        let modified_index = self
            .editor
            .split_tree()
            .pane(pane)
            .and_then(|p| p.tabs.iter().position(|d| d.is_modified()));

        match modified_index {
            Some(index) => self.request_close_tab(pane, index, AfterClose::CloseSplit),
            None => {
                match self.editor.close_pane(pane) {
                    Ok(()) => {
                        self.sync_contents();
                        self.status_message = "Split closed".to_string();
                    }
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
                Task::none()
            }
        }
    }

    // ==================== Widget sync ====================

    /// Performs a widget action on a pane's active document and mirrors
    /// the result (text, cursor, selection) into the model.
    fn perform_on_pane(&mut self, pane: PaneId, action: Action, is_edit: bool) {
        let doc_id = match self
            .editor
            .split_tree()
            .pane(pane)
            .and_then(|p| p.tabs.active_doc())
        {
            Some(doc) => doc.id(),
            None => return,
        };

        let (text, cursor, selection) = match self.contents.get_mut(&doc_id) {
            Some(content) => {
                content.perform(action);
                let text = if is_edit { Some(content.text()) } else { None };
                (text, content.cursor_position(), content.selection())
            }
            None => return,
        };

        let Some(doc) = self
            .editor
            .pane_mut(pane)
            .and_then(|p| p.tabs.active_doc_mut())
        else {
            return;
        };

        if let Some(text) = text {
            if let Err(e) = doc.sync_text(&text) {
                tracing::error!("view sync failed: {}", e);
            }
        }

        let cursor_pos = Position::new(cursor.0, cursor.1);
        doc.set_cursor(cursor_pos);

        // Recover the selection range: the widget only reports the selected
        // text, but the anchor must sit on whichever side of the cursor
        // reproduces it
        if let Some(selected) = selection {
            let len = selected.chars().count();
            let cur_idx = doc
                .buffer()
                .position_to_char_idx(doc.cursor_position())
                .unwrap_or(0);

            let before = cur_idx
                .checked_sub(len)
                .and_then(|start| doc.buffer().slice(start..cur_idx).ok())
                .map(|s| s.as_ref() == selected.as_str())
                .unwrap_or(false);

            if before {
                if let (Ok(anchor), pos) = (
                    doc.buffer().char_idx_to_position(cur_idx - len),
                    doc.cursor_position(),
                ) {
                    doc.set_selection(anchor, pos);
                }
            } else if let Ok(anchor) = doc.buffer().char_idx_to_position(
                (cur_idx + len).min(doc.buffer().len_chars()),
            ) {
                let pos = doc.cursor_position();
                doc.set_selection(anchor, pos);
            }
        }
    }

    fn active_selection(&self) -> Option<String> {
        let doc = self.editor.active_doc()?;
        self.contents.get(&doc.id())?.selection()
    }

    fn set_clipboard(&mut self, text: &str) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(text);
        }
    }

    fn get_clipboard(&mut self) -> Option<String> {
        arboard::Clipboard::new().ok()?.get_text().ok()
    }

    // ==================== Keyboard ====================

    pub fn handle_key_pressed(
        &mut self,
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
    ) -> Task<Message> {
        use keyboard::key::Named;

        // Escape dismisses whichever overlay is on top
        if matches!(key, keyboard::Key::Named(Named::Escape)) {
            if self.error_message.is_some() {
                return self.update(Message::DismissError);
            }
            if self.pending_close.is_some() {
                return self.update(Message::ConfirmCancel);
            }
            if self.goto_line_visible {
                return self.update(Message::GotoLineCancel);
            }
            if self.about_visible {
                return self.update(Message::HideAbout);
            }
            if self.active_menu.is_some() {
                return self.update(Message::CloseTopMenu);
            }
            if self.editor.find().open {
                return self.update(Message::CloseFind);
            }
            return Task::none();
        }

        let Some(press) = Self::to_key_press(&key, modifiers) else {
            return Task::none();
        };

        // Unmodified keys (except function keys) belong to the focused
        // widget
        if press.modifiers.is_empty() && !matches!(press.key, CoreKey::F(_)) {
            return Task::none();
        }

        match self.editor.keymap().lookup(&press) {
            Some(command) => self.update(Self::command_message(command)),
            None => Task::none(),
        }
    }

    fn to_key_press(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> Option<KeyPress> {
        use keyboard::key::Named;

        let core_key = match key {
            keyboard::Key::Character(s) => CoreKey::Char(s.to_lowercase().chars().next()?),
            keyboard::Key::Named(named) => match named {
                Named::Enter => CoreKey::Enter,
                Named::Tab => CoreKey::Tab,
                Named::Backspace => CoreKey::Backspace,
                Named::Delete => CoreKey::Delete,
                Named::ArrowUp => CoreKey::Up,
                Named::ArrowDown => CoreKey::Down,
                Named::ArrowLeft => CoreKey::Left,
                Named::ArrowRight => CoreKey::Right,
                Named::Home => CoreKey::Home,
                Named::End => CoreKey::End,
                Named::PageUp => CoreKey::PageUp,
                Named::PageDown => CoreKey::PageDown,
                Named::Space => CoreKey::Space,
                Named::F3 => CoreKey::F(3),
                _ => return None,
            },
            _ => return None,
        };

        Some(KeyPress::new(
            core_key,
            CoreModifiers {
                ctrl: modifiers.control(),
                alt: modifiers.alt(),
                shift: modifiers.shift(),
                meta: modifiers.logo(),
            },
        ))
    }

    fn command_message(command: Command) -> Message {
        match command {
            Command::NewFile => Message::NewTab,
            Command::OpenFile => Message::OpenFileDialog,
            Command::OpenFolder => Message::OpenFolderDialog,
            Command::Save => Message::Save,
            Command::SaveAs => Message::SaveAs,
            Command::CloseTab => Message::CloseActiveTab,
            Command::Quit => Message::CloseWindow,
            Command::Undo => Message::Undo,
            Command::Redo => Message::Redo,
            Command::Cut => Message::Cut,
            Command::Copy => Message::Copy,
            Command::Paste => Message::Paste,
            Command::SelectAll => Message::SelectAll,
            Command::SelectWord => Message::SelectWord,
            Command::SelectLine => Message::SelectLine,
            Command::DuplicateLine => Message::DuplicateLine,
            Command::DeleteLine => Message::DeleteLine,
            Command::MoveLineUp => Message::MoveLineUp,
            Command::MoveLineDown => Message::MoveLineDown,
            Command::SplitRight => Message::SplitRight,
            Command::SplitDown => Message::SplitDown,
            Command::CloseSplit => Message::CloseSplit,
            Command::FocusNextSplit => Message::FocusNextSplit,
            Command::FocusPreviousSplit => Message::FocusPreviousSplit,
            Command::Find => Message::ShowFind,
            Command::FindNext => Message::FindNext,
            Command::FindPrevious => Message::FindPrevious,
            Command::GotoLine => Message::ShowGotoLine,
            Command::NextTab => Message::NextTab,
            Command::PreviousTab => Message::PrevTab,
            Command::ToggleSidebar => Message::ToggleSidebar,
            _ => Message::CloseTopMenu,
        }
    }
}
