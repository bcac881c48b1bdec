//! User-facing editor commands.
//!
//! A command names an operation without carrying out any of it: the keymap
//! maps key presses to commands, the menu bar displays them, and the
//! application loop dispatches them to the editor.

/// Built-in editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command {
    // File
    NewFile,
    OpenFile,
    OpenFolder,
    Save,
    SaveAs,
    CloseTab,
    Quit,

    // Edit
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,

    // Selection
    SelectAll,
    SelectWord,
    SelectLine,

    // Line operations
    DuplicateLine,
    DeleteLine,
    MoveLineUp,
    MoveLineDown,

    // Splits
    SplitRight,
    SplitDown,
    CloseSplit,
    FocusNextSplit,
    FocusPreviousSplit,

    // Search
    Find,
    FindNext,
    FindPrevious,
    GotoLine,

    // Tabs
    NextTab,
    PreviousTab,

    // View
    ToggleSidebar,
}

impl Command {
    /// Returns the command's display name for menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::NewFile => "New File",
            Command::OpenFile => "Open File",
            Command::OpenFolder => "Open Folder",
            Command::Save => "Save",
            Command::SaveAs => "Save As",
            Command::CloseTab => "Close Tab",
            Command::Quit => "Quit",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::SelectAll => "Select All",
            Command::SelectWord => "Select Word",
            Command::SelectLine => "Select Line",
            Command::DuplicateLine => "Duplicate Line",
            Command::DeleteLine => "Delete Line",
            Command::MoveLineUp => "Move Line Up",
            Command::MoveLineDown => "Move Line Down",
            Command::SplitRight => "Split Right",
            Command::SplitDown => "Split Down",
            Command::CloseSplit => "Close Split",
            Command::FocusNextSplit => "Focus Next Split",
            Command::FocusPreviousSplit => "Focus Previous Split",
            Command::Find => "Find",
            Command::FindNext => "Find Next",
            Command::FindPrevious => "Find Previous",
            Command::GotoLine => "Go to Line",
            Command::NextTab => "Next Tab",
            Command::PreviousTab => "Previous Tab",
            Command::ToggleSidebar => "Toggle Sidebar",
        }
    }

    /// Parses a command from its config-file name (snake_case).
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "new_file" => Command::NewFile,
            "open_file" => Command::OpenFile,
            "open_folder" => Command::OpenFolder,
            "save" => Command::Save,
            "save_as" => Command::SaveAs,
            "close_tab" => Command::CloseTab,
            "quit" => Command::Quit,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "cut" => Command::Cut,
            "copy" => Command::Copy,
            "paste" => Command::Paste,
            "select_all" => Command::SelectAll,
            "select_word" => Command::SelectWord,
            "select_line" => Command::SelectLine,
            "duplicate_line" => Command::DuplicateLine,
            "delete_line" => Command::DeleteLine,
            "move_line_up" => Command::MoveLineUp,
            "move_line_down" => Command::MoveLineDown,
            "split_right" => Command::SplitRight,
            "split_down" => Command::SplitDown,
            "close_split" => Command::CloseSplit,
            "focus_next_split" => Command::FocusNextSplit,
            "focus_previous_split" => Command::FocusPreviousSplit,
            "find" => Command::Find,
            "find_next" => Command::FindNext,
            "find_previous" => Command::FindPrevious,
            "goto_line" => Command::GotoLine,
            "next_tab" => Command::NextTab,
            "previous_tab" => Command::PreviousTab,
            "toggle_sidebar" => Command::ToggleSidebar,
            _ => return None,
        })
    }
}
