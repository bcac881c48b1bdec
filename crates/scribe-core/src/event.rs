//! Event system for editor notifications.
//!
//! Components never hold references to each other; the editor publishes
//! value events on a broadcast channel and interested parties subscribe.
//! A lagging subscriber drops old events instead of blocking the sender.

use crate::document::DocumentId;
use crate::split::PaneId;
use tokio::sync::broadcast;

/// Events that can occur in the editor.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    // Document events
    /// A document was opened
    DocumentOpened(DocumentId),
    /// A document was closed
    DocumentClosed(DocumentId),
    /// A document was saved
    DocumentSaved(DocumentId),
    /// A document's content changed
    DocumentChanged(DocumentId),

    // Cursor events
    /// Cursor position changed
    CursorMoved(DocumentId),

    // Pane events
    /// A pane gained focus
    PaneFocused(PaneId),
    /// A pane was created by splitting
    PaneSplit(PaneId),
    /// A pane was closed
    PaneClosed(PaneId),

    // Editor events
    /// Configuration changed
    ConfigChanged,
    /// A workspace folder was opened
    WorkspaceOpened,
    /// Editor is quitting
    Quit,

    // File system events
    /// File changed on disk
    FileChangedOnDisk(std::path::PathBuf),
}

/// Broadcast bus for editor events.
///
/// Multiple subscribers each get their own copy; emitting with no
/// subscribers is not an error.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Helper for draining events asynchronously.
pub struct EventHandler {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    /// Creates a new event handler.
    pub fn new(receiver: broadcast::Receiver<EditorEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event, skipping over lagged gaps.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
