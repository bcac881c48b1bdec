//! Workspace browsing: a read-only mirror of a directory tree.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::{CoreError, CoreResult};

/// File extensions the editor opens from the tree. Everything else is
/// hidden, the way the file panel filters binaries and build artifacts.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    // Code
    "py", "js", "ts", "jsx", "tsx", "java", "c", "cpp", "h", "hpp", "rb", "go", "rs", "php",
    "swift", "kt", "scala",
    // Web
    "html", "css", "scss", "sass", "less",
    // Config / data
    "json", "yaml", "yml", "xml", "toml", "ini", "conf", "properties",
    // Text
    "txt", "md", "markdown", "rst", "tex",
    // Shell
    "sh", "bash", "zsh", "fish",
    // Other
    "sql", "csv", "log",
];

/// Represents a workspace (project folder).
pub struct Workspace {
    /// Root directory of the workspace
    root: PathBuf,

    /// Workspace name
    name: String,

    /// File tree, expanded lazily
    tree: FileNode,

    /// File watcher for detecting external changes
    watcher: Option<RecommendedWatcher>,
}

impl Workspace {
    /// Opens a workspace from a directory.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let root = path.as_ref().canonicalize()?;

        if !root.is_dir() {
            return Err(CoreError::FileNotFound(root.display().to_string()));
        }

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Workspace")
            .to_string();

        let mut tree = FileNode::directory(&root, 0);
        tree.expanded = true;
        tree.load_children();

        Ok(Self {
            root,
            name,
            tree,
            watcher: None,
        })
    }

    /// Starts watching for external file changes.
    ///
    /// The returned channel is drained by the UI; the watcher runs on its
    /// own thread and never touches the model directly.
    pub fn start_watching(&mut self) -> CoreResult<mpsc::Receiver<FileChange>> {
        let (tx, rx) = mpsc::channel(100);

        let watcher_tx = tx.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let change = match event.kind {
                            notify::EventKind::Create(_) => FileChange::Created(path),
                            notify::EventKind::Modify(_) => FileChange::Modified(path),
                            notify::EventKind::Remove(_) => FileChange::Deleted(path),
                            _ => continue,
                        };
                        let _ = watcher_tx.blocking_send(change);
                    }
                }
            })?;

        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        Ok(rx)
    }

    /// Returns the workspace root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the workspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file tree.
    pub fn tree(&self) -> &FileNode {
        &self.tree
    }

    /// Toggles a directory node open or closed, loading children on first
    /// expansion.
    pub fn toggle_folder(&mut self, path: &Path) {
        self.tree.toggle(path);
    }

    /// Rebuilds the tree from disk, preserving which folders are expanded.
    pub fn refresh(&mut self) {
        let mut expanded = HashSet::new();
        self.tree.collect_expanded(&mut expanded);

        let mut tree = FileNode::directory(&self.root, 0);
        tree.expanded = true;
        tree.load_children();
        tree.restore_expanded(&expanded);
        self.tree = tree;
    }

    /// Checks if a path is within the workspace.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().starts_with(&self.root)
    }
}

/// File change notification from the watcher.
#[derive(Debug, Clone)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
}

/// A node in the file tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name
    pub name: String,

    /// Full path
    pub path: PathBuf,

    /// True for directories
    pub is_dir: bool,

    /// Child nodes, loaded on first expansion
    pub children: Vec<FileNode>,

    /// Whether a directory node is expanded
    pub expanded: bool,

    /// Nesting depth from the workspace root (for indentation)
    pub depth: u16,
}

impl FileNode {
    fn directory(path: &Path, depth: u16) -> Self {
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            path: path.to_path_buf(),
            is_dir: true,
            children: Vec::new(),
            expanded: false,
            depth,
        }
    }

    fn from_entry(path: &Path, depth: u16) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_string();
        Some(Self {
            name,
            path: path.to_path_buf(),
            is_dir: path.is_dir(),
            children: Vec::new(),
            expanded: false,
            depth,
        })
    }

    /// Returns true when this entry belongs in the tree: directories
    /// always, files only with a supported extension.
    pub fn is_supported(path: &Path) -> bool {
        if path.is_dir() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Loads the direct children of a directory node, once.
    pub fn load_children(&mut self) {
        if !self.is_dir || !self.children.is_empty() {
            return;
        }

        if let Ok(entries) = std::fs::read_dir(&self.path) {
            let mut children: Vec<FileNode> = entries
                .filter_map(|e| e.ok())
                .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
                .filter(|e| Self::is_supported(&e.path()))
                .filter_map(|e| FileNode::from_entry(&e.path(), self.depth + 1))
                .collect();

            // Directories first, then case-insensitive alphabetical
            children.sort_by(|a, b| match (a.is_dir, b.is_dir) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            });

            self.children = children;
        }
    }

    fn toggle(&mut self, target: &Path) {
        if self.path == target {
            if self.is_dir {
                self.expanded = !self.expanded;
                if self.expanded {
                    self.load_children();
                }
            }
            return;
        }
        for child in &mut self.children {
            if target.starts_with(&child.path) {
                child.toggle(target);
            }
        }
    }

    fn collect_expanded(&self, set: &mut HashSet<PathBuf>) {
        if self.expanded {
            set.insert(self.path.clone());
            for child in &self.children {
                child.collect_expanded(set);
            }
        }
    }

    fn restore_expanded(&mut self, expanded: &HashSet<PathBuf>) {
        if self.is_dir && expanded.contains(&self.path) {
            self.expanded = true;
            self.load_children();
            for child in &mut self.children {
                child.restore_expanded(expanded);
            }
        }
    }
}

impl From<notify::Error> for CoreError {
    fn from(err: notify::Error) -> Self {
        CoreError::Io(std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("script.py"), "print('hi')").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "notes").unwrap();
        std::fs::write(dir.path().join("image.png"), "binary").unwrap();
        std::fs::write(dir.path().join(".hidden"), "secret").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        std::fs::write(dir.path().join("subdir/module.rs"), "fn f() {}").unwrap();
        dir
    }

    #[test]
    fn test_workspace_open() {
        let dir = fixture();
        let ws = Workspace::open(dir.path()).unwrap();
        assert!(ws.contains(dir.path().join("notes.txt")));
        assert!(!ws.tree().children.is_empty());
    }

    #[test]
    fn test_unsupported_and_hidden_files_filtered() {
        let dir = fixture();
        let ws = Workspace::open(dir.path()).unwrap();
        let names: Vec<&str> = ws.tree().children.iter().map(|c| c.name.as_str()).collect();

        assert!(names.contains(&"script.py"));
        assert!(names.contains(&"notes.txt"));
        assert!(!names.contains(&"image.png"));
        assert!(!names.contains(&".hidden"));
    }

    #[test]
    fn test_directories_sort_first() {
        let dir = fixture();
        let ws = Workspace::open(dir.path()).unwrap();
        assert_eq!(ws.tree().children[0].name, "subdir");
        assert!(ws.tree().children[0].is_dir);
    }

    #[test]
    fn test_lazy_expansion() {
        let dir = fixture();
        let mut ws = Workspace::open(dir.path()).unwrap();
        let subdir = dir.path().canonicalize().unwrap().join("subdir");

        // Children are not loaded until the folder is expanded
        let node = &ws.tree().children[0];
        assert!(node.children.is_empty());

        ws.toggle_folder(&subdir);
        let node = &ws.tree().children[0];
        assert!(node.expanded);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name, "module.rs");
        assert_eq!(node.children[0].depth, 2);
    }

    #[test]
    fn test_refresh_preserves_expansion() {
        let dir = fixture();
        let mut ws = Workspace::open(dir.path()).unwrap();
        let subdir = dir.path().canonicalize().unwrap().join("subdir");

        ws.toggle_folder(&subdir);
        std::fs::write(dir.path().join("subdir/new.rs"), "").unwrap();
        ws.refresh();

        let node = &ws.tree().children[0];
        assert!(node.expanded);
        assert_eq!(node.children.len(), 2);
    }

    #[test]
    fn test_start_watching_returns_channel() {
        let dir = fixture();
        let mut ws = Workspace::open(dir.path()).unwrap();
        assert!(ws.start_watching().is_ok());
    }

    #[test]
    fn test_open_non_directory_fails() {
        let dir = fixture();
        assert!(Workspace::open(dir.path().join("notes.txt")).is_err());
    }
}
