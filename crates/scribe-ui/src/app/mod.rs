use iced::widget::text_editor;
use iced::{keyboard, Subscription, Task};
use std::collections::HashMap;
use std::path::PathBuf;

use scribe_core::{DocumentId, Editor, PaneId};

pub mod file_ops;
pub mod messages;
pub mod update;
pub mod view;

pub use messages::{Message, TopMenu};

/// Launch options from the command line.
#[derive(Debug, Default)]
pub struct Flags {
    /// File to open on launch
    pub file: Option<PathBuf>,
    /// Workspace folder to open on launch
    pub workspace: Option<PathBuf>,
}

/// What to do after a pending tab close resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterClose {
    /// Just close the tab
    Nothing,
    /// Continue closing the split pane
    CloseSplit,
    /// Continue the quit scan
    Quit,
}

/// A tab close waiting on the user's save/discard/cancel decision.
///
/// While this is set, the modal dialog is showing and the tab cannot be
/// removed by any other path.
#[derive(Debug, Clone, Copy)]
pub struct PendingClose {
    pub pane: PaneId,
    pub index: usize,
    pub then: AfterClose,
}

pub struct App {
    /// The core editor model
    pub editor: Editor,
    /// Widget state per open document
    pub contents: HashMap<DocumentId, text_editor::Content>,

    pub status_message: String,
    pub sidebar_visible: bool,
    pub active_menu: Option<TopMenu>,
    pub pending_close: Option<PendingClose>,
    pub error_message: Option<String>,
    pub goto_line_visible: bool,
    pub goto_line_input: String,
    pub about_visible: bool,
    pub font_size: f32,
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let editor = Editor::with_config(scribe_core::Config::load());
        let font_size = editor.config().ui.font_size;
        let sidebar_default = editor.config().ui.show_sidebar;

        let mut app = Self {
            editor,
            contents: HashMap::new(),
            status_message: "Ready | Ctrl+O: Open | Ctrl+S: Save | Ctrl+N: New".to_string(),
            sidebar_visible: sidebar_default,
            active_menu: None,
            pending_close: None,
            error_message: None,
            goto_line_visible: false,
            goto_line_input: String::new(),
            about_visible: false,
            font_size,
        };

        if let Some(dir) = &flags.workspace {
            match app.editor.open_workspace(dir) {
                Ok(()) => app.sidebar_visible = true,
                Err(e) => app.status_message = format!("Error: {}", e),
            }
        }
        if let Some(file) = flags.file.clone() {
            app.open_path(&file);
        }
        app.sync_contents();

        (app, Task::none())
    }

    pub fn title(&self) -> String {
        match self.editor.active_doc() {
            Some(doc) if doc.is_modified() => format!("{} * - Scribe", doc.name()),
            Some(doc) => format!("{} - Scribe", doc.name()),
            None => "Scribe".to_string(),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, modifiers| Some(Message::KeyPressed(key, modifiers)))
    }
}

pub fn run(flags: Flags) -> iced::Result {
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(iced::Size::new(1280.0, 800.0))
        .theme(|_| iced::Theme::Dark)
        .antialiasing(true)
        .run_with(move || App::new(flags))
}
