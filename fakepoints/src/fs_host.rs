//! A [`BuildHost`] backed by the real file system.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::error::{FakepointError, Result};
use crate::event::{WatchEvent, WatchEventKind};
use crate::host::BuildHost;
use crate::scanner::{FileScanner, relative_slash_path};
use crate::watch::RestartReason;

/// Ignore globs every session applies, on top of the plugin's own.
pub const DEFAULT_WATCH_IGNORED: &[&str] = &["**/node_modules/**", "**/.git/**"];

const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Watches a root with `notify` and counts restarts.
///
/// Events are forwarded through a bounded channel so the consumer sees them
/// one at a time. A restart bumps a generation counter that the session
/// loop observes to reload the virtual module.
pub struct FsHost {
    root: PathBuf,
    watcher: Mutex<RecommendedWatcher>,
    registered: Mutex<HashSet<PathBuf>>,
    generation: watch::Sender<u64>,
}

impl FsHost {
    /// Start watching `root` recursively.
    ///
    /// `ignore_globs` are matched against root-relative `/` paths; events
    /// under matching paths are never delivered. When a directory appears,
    /// `scanner` lists the matching files already inside it and each one is
    /// reported as an add.
    pub fn start(
        root: &Path,
        ignore_globs: &[String],
        scanner: FileScanner,
    ) -> Result<(Self, mpsc::Receiver<WatchEvent>)> {
        let root = root.to_path_buf();
        let ignored = compile_globs(ignore_globs)?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let callback_root = root.clone();
        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for path in &event.paths {
                        if is_ignored(&callback_root, path, &ignored) {
                            continue;
                        }

                        let kind = WatchEventKind::from_notify(event.kind, path.is_dir());
                        send(&event_tx, WatchEvent::new(kind, path));

                        // Files already inside a new or moved-in directory
                        // produce no events of their own.
                        if kind == WatchEventKind::AddDir {
                            for file in scanner.files_under(path) {
                                if !is_ignored(&callback_root, &file, &ignored) {
                                    send(&event_tx, WatchEvent::add(file));
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("Watching {}", root.display());

        let (generation, _) = watch::channel(0);
        let host = Self {
            registered: Mutex::new(HashSet::from([root.clone()])),
            root,
            watcher: Mutex::new(watcher),
            generation,
        };

        Ok((host, event_rx))
    }

    /// Root being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Receiver that changes every time the host restarts.
    pub fn subscribe_restarts(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Number of restarts so far.
    pub fn restart_count(&self) -> u64 {
        *self.generation.borrow()
    }
}

#[async_trait]
impl BuildHost for FsHost {
    fn watcher_add(&self, path: &Path) {
        let Ok(mut registered) = self.registered.lock() else {
            return;
        };
        if !registered.insert(path.to_path_buf()) {
            return;
        }

        // The recursive root watch already covers everything below it.
        if path.starts_with(&self.root) {
            return;
        }

        let result = match self.watcher.lock() {
            Ok(mut watcher) => watcher.watch(path, RecursiveMode::NonRecursive),
            Err(_) => return,
        };
        match result {
            Ok(()) => debug!("Started watching: {}", path.display()),
            Err(e) => warn!("Failed to watch {}: {e}", path.display()),
        }
    }

    async fn restart(&self, reason: RestartReason) -> anyhow::Result<()> {
        if self.generation.receiver_count() == 0 {
            anyhow::bail!("no session is listening for restarts");
        }
        self.generation.send_modify(|g| *g += 1);
        info!("Host restarted ({reason})");
        Ok(())
    }
}

fn send(tx: &mpsc::Sender<WatchEvent>, event: WatchEvent) {
    if let Err(e) = tx.blocking_send(event) {
        error!("Failed to send watch event: {e}");
    }
}

fn compile_globs(globs: &[String]) -> Result<Vec<glob::Pattern>> {
    globs
        .iter()
        .map(|g| {
            glob::Pattern::new(g)
                .map_err(|e| FakepointError::Config(format!("invalid watch ignore glob {g:?}: {e}")))
        })
        .collect()
}

fn is_ignored(root: &Path, path: &Path, ignored: &[glob::Pattern]) -> bool {
    let Some(rel) = relative_slash_path(root, path) else {
        return false;
    };
    ignored.iter().any(|pattern| pattern.matches(&rel))
}
