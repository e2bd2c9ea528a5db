//! Fakepoint file discovery.

use std::path::{Path, PathBuf};

use tokio::task::JoinError;
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::ScanError;

/// Files found by a scan, in walk order.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    /// Root-relative paths with `/` separators.
    pub files: Vec<String>,

    /// Directories that could not be read and were skipped.
    pub skipped: Vec<ScanError>,
}

impl DiscoveredFiles {
    /// Number of discovered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Absolute paths of the discovered files under `root`.
    pub fn absolute_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|rel| root.join(rel)).collect()
    }
}

/// Walks a workspace looking for fakepoint files.
#[derive(Debug, Clone)]
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Create a scanner for a scan configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The configuration this scanner uses.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Walk the root depth-first and collect matching files.
    ///
    /// Ignored directories are pruned by base name at any depth. Unreadable
    /// directories are logged and skipped; the walk carries on. Entries are
    /// visited in file-name order so repeated scans of an unchanged tree
    /// return identical results.
    pub fn scan(&self) -> DiscoveredFiles {
        let root = &self.config.root;
        let mut found = DiscoveredFiles::default();

        for result in self.walk(root) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let err = ScanError::from(err);
                    warn!("Skipping unreadable directory: {err}");
                    found.skipped.push(err);
                    continue;
                }
            };

            if !self.is_match(&entry) {
                continue;
            }

            if let Some(rel) = relative_slash_path(root, entry.path()) {
                debug!("Discovered fakepoint: {rel}");
                found.files.push(rel);
            }
        }

        found
    }

    /// Matching files below `dir`, as absolute paths.
    ///
    /// The ignore rules apply as if `dir` had been reached by a full scan
    /// from the root: nothing is returned for a directory inside (or named
    /// like) an ignored directory, or for one outside the root.
    pub fn files_under(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(rel) = dir.strip_prefix(&self.config.root) else {
            return Vec::new();
        };
        let inside_ignored = rel.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| self.config.is_ignored_dir(name))
        });
        if inside_ignored {
            return Vec::new();
        }

        self.walk(dir)
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable directory: {}", ScanError::from(err));
                    None
                }
            })
            .filter(|entry| self.is_match(entry))
            .map(DirEntry::into_path)
            .collect()
    }

    /// Run [`FileScanner::scan`] on the blocking pool.
    ///
    /// A panic inside the scan is resumed on the caller.
    pub async fn scan_async(&self) -> DiscoveredFiles {
        let scanner = self.clone();
        finish_scan(tokio::task::spawn_blocking(move || scanner.scan()).await)
    }

    fn walk<'a>(&'a self, start: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
        WalkDir::new(start)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry))
    }

    fn is_match(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.matches(name))
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.is_ignored_dir(name))
    }
}

fn finish_scan(joined: std::result::Result<DiscoveredFiles, JoinError>) -> DiscoveredFiles {
    match joined {
        Ok(found) => found,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            error!("Scan task was cancelled: {e}");
            DiscoveredFiles::default()
        }
    }
}

/// `path` relative to `root`, joined with `/` whatever the platform.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
