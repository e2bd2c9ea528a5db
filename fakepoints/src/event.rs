//! Low-level watcher events delivered by the host.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file system event surfaced by the host's watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// The kind of event.
    pub kind: WatchEventKind,

    /// Absolute path of the affected file or directory.
    pub path: PathBuf,
}

impl WatchEvent {
    /// Create a new watch event.
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// A file appeared.
    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Add, path)
    }

    /// A file went away.
    pub fn unlink(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Unlink, path)
    }

    /// A file's contents changed.
    pub fn change(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchEventKind::Change, path)
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}

/// Kind of watcher event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WatchEventKind {
    /// File was created.
    Add,

    /// Directory was created.
    AddDir,

    /// File contents changed.
    Change,

    /// File was deleted.
    Unlink,

    /// Directory was deleted.
    UnlinkDir,

    /// Anything else (access, metadata).
    Other,
}

impl WatchEventKind {
    /// Classify a notify event for a path that is (or was) a directory or not.
    pub fn from_notify(kind: notify::EventKind, is_dir: bool) -> Self {
        use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
        use notify::EventKind;

        match kind {
            EventKind::Create(CreateKind::Folder) => Self::AddDir,
            EventKind::Create(_) if is_dir => Self::AddDir,
            EventKind::Create(_) => Self::Add,
            EventKind::Remove(RemoveKind::Folder) => Self::UnlinkDir,
            EventKind::Remove(_) => Self::Unlink,
            EventKind::Modify(ModifyKind::Name(rename)) => match rename {
                RenameMode::From => Self::Unlink,
                RenameMode::To if is_dir => Self::AddDir,
                RenameMode::To => Self::Add,
                _ => Self::Other,
            },
            EventKind::Modify(ModifyKind::Metadata(_)) => Self::Other,
            EventKind::Modify(_) => Self::Change,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::AddDir => "addDir",
            Self::Change => "change",
            Self::Unlink => "unlink",
            Self::UnlinkDir => "unlinkDir",
            Self::Other => "raw",
        };
        f.write_str(name)
    }
}
