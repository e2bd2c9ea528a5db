//! Turns add/unlink watcher events into host restarts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FakepointError, Result};
use crate::event::{WatchEvent, WatchEventKind};
use crate::host::BuildHost;

/// Why a restart was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RestartReason {
    /// A matching file appeared.
    FileAdded,

    /// A matching file was removed.
    FileDeleted,
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileAdded => f.write_str("file added"),
            Self::FileDeleted => f.write_str("file deleted"),
        }
    }
}

/// Tracks the set of fakepoint files registered with the host watcher.
///
/// Only the *set* of files is tracked. Edits to an existing file are picked
/// up by the host's own change detection and never reach this type.
///
/// Only built when watching is enabled; with `watch: false` the plugin never
/// constructs one, so no event can cause a restart.
pub struct WatchCoordinator {
    host: Arc<dyn BuildHost>,
    file_pattern: String,
    debug: bool,
    tracked: Vec<PathBuf>,
}

impl WatchCoordinator {
    /// Register the root and every initial file with the host watcher.
    ///
    /// Files are added individually so in-place edits are seen even where a
    /// directory watch would miss them; the root is added so that matching
    /// files in directories that did not exist yet still produce add events.
    pub fn setup(
        host: Arc<dyn BuildHost>,
        root: &Path,
        initial_files: Vec<PathBuf>,
        file_pattern: impl Into<String>,
        debug: bool,
    ) -> Self {
        host.watcher_add(root);
        for file in &initial_files {
            host.watcher_add(file);
        }

        info!(
            "Watching {} fakepoint file(s) under {}",
            initial_files.len(),
            root.display()
        );

        Self {
            host,
            file_pattern: file_pattern.into(),
            debug,
            tracked: initial_files,
        }
    }

    /// Paths currently registered, in registration order.
    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Dispatch a raw watcher event.
    pub async fn handle_event(&mut self, event: &WatchEvent) -> Result<()> {
        if self.debug && self.matches(&event.path) {
            info!("[fakepoints] watcher event: {event}");
        }

        match event.kind {
            WatchEventKind::Add => self.on_add(&event.path).await,
            WatchEventKind::Unlink if self.matches(&event.path) => {
                self.on_unlink(&event.path).await
            }
            // A directory moved away is reported as a plain unlink of a path
            // that no longer exists, so it cannot be told apart by kind.
            WatchEventKind::Unlink | WatchEventKind::UnlinkDir => {
                self.on_unlink_dir(&event.path).await
            }
            _ => Ok(()),
        }
    }

    /// A file appeared.
    pub async fn on_add(&mut self, path: &Path) -> Result<()> {
        if !self.matches(path) {
            return Ok(());
        }

        self.tracked.push(path.to_path_buf());
        self.host.watcher_add(path);
        info!("Fakepoint added: {}", path.display());

        self.trigger_restart(RestartReason::FileAdded).await
    }

    /// A file was removed.
    pub async fn on_unlink(&mut self, path: &Path) -> Result<()> {
        if !self.matches(path) {
            return Ok(());
        }

        // Duplicate unlink events are expected; absence is fine.
        if let Some(index) = self.tracked.iter().position(|p| p == path) {
            self.tracked.remove(index);
        }
        info!("Fakepoint deleted: {}", path.display());

        self.trigger_restart(RestartReason::FileDeleted).await
    }

    /// A directory was removed or moved away. Every tracked file below it is
    /// dropped; if there were any, the host restarts once.
    pub async fn on_unlink_dir(&mut self, dir: &Path) -> Result<()> {
        let before = self.tracked.len();
        self.tracked.retain(|path| !path.starts_with(dir));
        let removed = before - self.tracked.len();
        if removed == 0 {
            return Ok(());
        }

        info!(
            "Fakepoint directory deleted: {} ({removed} file(s))",
            dir.display()
        );
        self.trigger_restart(RestartReason::FileDeleted).await
    }

    /// Replace the tracked set with the files of a fresh scan.
    ///
    /// Called after a restart so paths the scan no longer reports (deleted
    /// or excluded by the ignore rules) stop being tracked. New paths are
    /// registered with the host watcher.
    pub fn resync(&mut self, files: Vec<PathBuf>) {
        for file in &files {
            if !self.tracked.contains(file) {
                self.host.watcher_add(file);
            }
        }

        let dropped = self.tracked.iter().filter(|p| !files.contains(p)).count();
        debug!(
            "Resynced tracked fakepoints: {} tracked, {dropped} dropped",
            files.len()
        );
        self.tracked = files;
    }

    /// Ask the host to restart and wait for it.
    pub async fn trigger_restart(&self, reason: RestartReason) -> Result<()> {
        info!("Restarting: {reason}");
        self.host
            .restart(reason)
            .await
            .map_err(|source| FakepointError::Restart { reason, source })?;
        debug!("Restart complete: {reason}");
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(std::ffi::OsStr::to_str)
            .is_some_and(|name| name.ends_with(&self.file_pattern))
    }
}
