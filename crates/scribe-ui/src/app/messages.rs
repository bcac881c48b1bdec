use iced::keyboard;
use iced::widget::text_editor;
use std::path::PathBuf;

use scribe_core::PaneId;

/// Top-level menu bar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopMenu {
    File,
    Edit,
    Search,
    View,
    Help,
}

#[derive(Debug, Clone)]
pub enum Message {
    // File operations
    NewTab,
    OpenFileDialog,
    OpenFolderDialog,
    Save,
    SaveAs,
    FileChosen(Option<PathBuf>),
    FolderChosen(Option<PathBuf>),
    SavePathChosen(Option<PathBuf>),

    // Tabs
    TabSelected(PaneId, usize),
    CloseTab(PaneId, usize),
    CloseActiveTab,
    NextTab,
    PrevTab,

    // Editor widget
    EditorAction(PaneId, text_editor::Action),

    // Edit operations
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

    // Find/replace
    ShowFind,
    CloseFind,
    FindQueryChanged(String),
    ReplacementChanged(String),
    ToggleCaseSensitive(bool),
    ToggleWholeWord(bool),
    FindNext,
    FindPrevious,
    Replace,
    ReplaceAll,

    // Sidebar / file tree
    ToggleSidebar,
    FileClicked(PathBuf),
    ToggleFolder(PathBuf),

    // Unsaved-changes decisions
    ConfirmSave,
    ConfirmDiscard,
    ConfirmCancel,

    // Go to line
    ShowGotoLine,
    GotoLineInputChanged(String),
    GotoLineConfirm,
    GotoLineCancel,

    // Dialogs
    ShowAbout,
    HideAbout,
    DismissError,

    // Menu bar
    ToggleTopMenu(TopMenu),
    CloseTopMenu,

    // Keyboard
    KeyPressed(keyboard::Key, keyboard::Modifiers),

    // Window
    CloseWindow,
}
