//! # Scribe Core
//!
//! Editor model and state management: documents, tab groups, the split
//! tree, find/replace, workspace browsing, configuration and key bindings.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Editor                            │
//! │  ┌───────────┐ ┌────────┐ ┌────────┐ ┌───────────────┐   │
//! │  │ Workspace │ │ Config │ │ Keymap │ │  FindState    │   │
//! │  └───────────┘ └────────┘ └────────┘ └───────────────┘   │
//! │        │                                                 │
//! │  ┌─────┴─────────────── SplitTree ───────────────────┐   │
//! │  │        Split(H)                                   │   │
//! │  │       /        \                                  │   │
//! │  │   Leaf(pane)  Leaf(pane)     each pane: TabGroup  │   │
//! │  │                              each tab:  Document  │   │
//! │  └───────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The model is mutated synchronously on the UI thread; the [`EventBus`]
//! broadcasts what changed so dependent views can react.

pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod event;
pub mod find;
pub mod keymap;
pub mod split;
pub mod tabs;
pub mod workspace;

pub use command::Command;
pub use config::Config;
pub use document::{Document, DocumentId};
pub use editor::Editor;
pub use event::{EditorEvent, EventBus};
pub use find::FindState;
pub use keymap::{KeyPress, Keymap};
pub use split::{Orientation, Pane, PaneId, SplitNode, SplitTree};
pub use tabs::{CloseDecision, ClosePlan, CloseOutcome, TabGroup};
pub use workspace::Workspace;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("No active document")]
    NoActiveDocument,

    #[error("Pane not found")]
    PaneNotFound,

    #[error("Cannot close the only pane")]
    LastPane,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] scribe_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
