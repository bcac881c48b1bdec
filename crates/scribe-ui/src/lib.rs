//! # Scribe UI
//!
//! The iced front end, following the Elm architecture:
//! - **Model**: [`app::App`], the core editor plus per-document widget state
//! - **Message**: [`app::Message`], everything that can happen
//! - **Update**: routes messages into `scribe-core` and keeps widget
//!   contents in sync with the documents
//! - **View**: renders the split tree, tab bars, find bar and dialogs

pub mod app;
pub mod theme;

pub use app::{run, App, Flags};
