//! Plugin options and the scan configuration derived from them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FakepointError, Result};

/// File-name suffix matched when no pattern is configured.
pub const DEFAULT_FILE_PATTERN: &str = ".fakepoints.ts";

/// Directory names that are never scanned.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "dist", "tmp", ".git"];

/// Options read from the host project's build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FakepointsConfig {
    /// Root for scanning and for root-relative import paths.
    pub workspace_root: PathBuf,

    /// File-name suffix of fakepoint files.
    pub file_pattern: String,

    /// Whether add/delete events restart the host.
    pub watch: bool,

    /// Extra directory base names to skip.
    pub ignore_dirs: Vec<String>,

    /// Verbose diagnostics.
    pub debug: bool,
}

impl FakepointsConfig {
    /// Create a config rooted at `workspace_root`.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            ..Self::default()
        }
    }

    /// Parse options handed over by the host as JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| FakepointError::Config(format!("invalid plugin options: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the file-name suffix.
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Enable or disable watching.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Add a directory name to ignore.
    pub fn ignore_dir(mut self, name: impl Into<String>) -> Self {
        self.ignore_dirs.push(name.into());
        self
    }

    /// Enable debug diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check option shapes that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.file_pattern.is_empty() {
            return Err(FakepointError::Config(
                "filePattern must not be empty".to_string(),
            ));
        }
        if has_separator(&self.file_pattern) {
            return Err(FakepointError::Config(format!(
                "filePattern must be a file-name suffix, got {:?}",
                self.file_pattern
            )));
        }
        for name in &self.ignore_dirs {
            if name.is_empty() || has_separator(name) {
                return Err(FakepointError::Config(format!(
                    "ignoreDirs entries must be directory base names, got {name:?}"
                )));
            }
        }
        Ok(())
    }

    /// Build the immutable scan configuration.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(&self.workspace_root, &self.file_pattern, &self.ignore_dirs)
    }

    /// Watcher ignore globs for the host, one `**/<name>/**` per extra name.
    ///
    /// `None` when the caller supplied no names, so nothing is contributed.
    pub fn watch_ignore_globs(&self) -> Option<Vec<String>> {
        if self.ignore_dirs.is_empty() {
            return None;
        }
        Some(
            self.ignore_dirs
                .iter()
                .map(|name| format!("**/{name}/**"))
                .collect(),
        )
    }
}

impl Default for FakepointsConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            watch: true,
            ignore_dirs: Vec::new(),
            debug: false,
        }
    }
}

fn has_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\\')
}

/// What the scanner walks and what it keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory to walk.
    pub root: PathBuf,

    /// File-name suffix to keep.
    pub file_pattern: String,

    /// Directory base names to prune.
    pub ignored_dirs: BTreeSet<String>,
}

impl ScanConfig {
    /// Defaults unioned with `extra_ignored`.
    pub fn new(root: impl AsRef<Path>, file_pattern: &str, extra_ignored: &[String]) -> Self {
        let ignored_dirs = DEFAULT_IGNORED_DIRS
            .iter()
            .map(|s| (*s).to_string())
            .chain(extra_ignored.iter().cloned())
            .collect();

        Self {
            root: root.as_ref().to_path_buf(),
            file_pattern: file_pattern.to_string(),
            ignored_dirs,
        }
    }

    /// Whether a directory with this base name is pruned.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.contains(name)
    }

    /// Whether a file name carries the fakepoint suffix.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.file_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FakepointsConfig::new("/workspace");

        assert_eq!(config.workspace_root, Path::new("/workspace"));
        assert_eq!(config.file_pattern, ".fakepoints.ts");
        assert!(config.watch);
        assert!(!config.debug);
        assert!(config.ignore_dirs.is_empty());
    }

    #[test]
    fn test_scan_config_unions_ignored_dirs() {
        let config = FakepointsConfig::new("/workspace")
            .ignore_dir("tests")
            .ignore_dir("utils");
        let scan = config.scan_config();

        for name in ["node_modules", "dist", "tmp", ".git", "tests", "utils"] {
            assert!(scan.is_ignored_dir(name), "{name} should be ignored");
        }
        assert!(!scan.is_ignored_dir("src"));
    }

    #[test]
    fn test_suffix_match_is_exact_and_case_sensitive() {
        let scan = FakepointsConfig::new("/w").scan_config();

        assert!(scan.matches("user.fakepoints.ts"));
        assert!(!scan.matches("user.Fakepoints.ts"));
        assert!(!scan.matches("user.fakepoints.tsx"));
        assert!(!scan.matches("user.ts"));
    }

    #[test]
    fn test_watch_ignore_globs() {
        let none = FakepointsConfig::new("/w");
        assert_eq!(none.watch_ignore_globs(), None);

        let some = FakepointsConfig::new("/w").ignore_dir("fixtures");
        assert_eq!(
            some.watch_ignore_globs(),
            Some(vec!["**/fixtures/**".to_string()])
        );
    }

    #[test]
    fn test_from_json() {
        let config = FakepointsConfig::from_json(json!({
            "workspaceRoot": "/repo",
            "filePattern": ".test-data.ts",
            "watch": false,
            "ignoreDirs": ["tests"],
            "debug": true,
        }))
        .unwrap();

        assert_eq!(config.workspace_root, Path::new("/repo"));
        assert_eq!(config.file_pattern, ".test-data.ts");
        assert!(!config.watch);
        assert!(config.debug);
        assert_eq!(config.ignore_dirs, vec!["tests".to_string()]);
    }

    #[test]
    fn test_from_json_rejects_wrong_shapes() {
        let cases = [
            json!({ "watch": "yes" }),
            json!({ "ignoreDirs": "tests" }),
            json!({ "filePattern": "" }),
            json!({ "filePattern": "src/*.ts" }),
            json!({ "ignoreDirs": ["a/b"] }),
            json!({ "unknown": 1 }),
        ];

        for case in cases {
            let result = FakepointsConfig::from_json(case.clone());
            assert!(
                matches!(result, Err(FakepointError::Config(_))),
                "expected config error for {case}"
            );
        }
    }
}
