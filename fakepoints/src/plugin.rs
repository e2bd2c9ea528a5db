//! The fakepoints build-tool plugin.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::FakepointsConfig;
use crate::error::Result;
use crate::event::WatchEvent;
use crate::host::BuildHost;
use crate::module::{self, RESOLVED_VIRTUAL_MODULE_ID, VIRTUAL_MODULE_ID};
use crate::scanner::{DiscoveredFiles, FileScanner};
use crate::watch::WatchCoordinator;

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "fakepoints";

/// Server configuration the plugin contributes to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfigFragment {
    /// Watcher settings.
    pub watch: WatchConfigFragment,
}

/// Watcher settings contributed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchConfigFragment {
    /// Globs the host watcher must not report events for.
    pub ignored: Vec<String>,
}

/// Discovers fakepoint files, serves them as one virtual module and restarts
/// the host when the set of files changes.
pub struct FakepointsPlugin {
    config: FakepointsConfig,
    scanner: FileScanner,
    watch: Option<WatchCoordinator>,
}

impl FakepointsPlugin {
    /// Create the plugin. Invalid options fail here, not at scan time.
    pub fn new(config: FakepointsConfig) -> Result<Self> {
        config.validate()?;
        let scanner = FileScanner::new(config.scan_config());

        Ok(Self {
            config,
            scanner,
            watch: None,
        })
    }

    /// Create the plugin from host-provided JSON options.
    pub fn from_options(options: serde_json::Value) -> Result<Self> {
        Self::new(FakepointsConfig::from_json(options)?)
    }

    /// Plugin name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// The options this plugin was built with.
    pub fn config(&self) -> &FakepointsConfig {
        &self.config
    }

    /// Claim the virtual module id; anything else passes through.
    pub fn resolve_id(&self, id: &str) -> Option<&'static str> {
        (id == VIRTUAL_MODULE_ID).then_some(RESOLVED_VIRTUAL_MODULE_ID)
    }

    /// Generate the virtual module. Scans afresh on every call.
    pub async fn load(&self, id: &str) -> Option<String> {
        if id != RESOLVED_VIRTUAL_MODULE_ID {
            return None;
        }

        let found = self.scan().await;
        let source = module::synthesize(&found.files, &self.config.file_pattern, self.config.debug);
        if let Some(warning) = &source.warning {
            warn!("[fakepoints] {warning}");
        }
        if self.config.debug {
            info!("[fakepoints] loaded virtual module with {} import(s)", found.len());
        }

        Some(source.code)
    }

    /// Watcher ignore globs for the host, or `None` when there is nothing
    /// to add.
    pub fn server_config(&self) -> Option<ServerConfigFragment> {
        self.config
            .watch_ignore_globs()
            .map(|ignored| ServerConfigFragment {
                watch: WatchConfigFragment { ignored },
            })
    }

    /// Arm the watch coordinator against `host`.
    ///
    /// With `watch: false` this returns without registering anything, and
    /// later events are dropped.
    pub async fn configure_server(&mut self, host: Arc<dyn BuildHost>) {
        if !self.config.watch {
            debug!("Watching disabled; not attaching watcher listeners");
            return;
        }

        let found = self.scan().await;
        let root = &self.config.workspace_root;
        self.watch = Some(WatchCoordinator::setup(
            host,
            root,
            found.absolute_paths(root),
            self.config.file_pattern.clone(),
            self.config.debug,
        ));
    }

    /// Bring the coordinator's tracked files back in line with a fresh
    /// scan. Does nothing when no coordinator is armed.
    pub async fn resync_watch(&mut self) {
        if self.watch.is_none() {
            return;
        }

        let files = self.scan().await.absolute_paths(&self.config.workspace_root);
        if let Some(watch) = self.watch.as_mut() {
            watch.resync(files);
        }
    }

    /// Whether [`FakepointsPlugin::configure_server`] armed a coordinator.
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// The armed coordinator, if any.
    pub fn watch_coordinator(&self) -> Option<&WatchCoordinator> {
        self.watch.as_ref()
    }

    /// Feed one host watcher event to the coordinator.
    pub async fn handle_watch_event(&mut self, event: &WatchEvent) -> Result<()> {
        match self.watch.as_mut() {
            Some(watch) => watch.handle_event(event).await,
            None => Ok(()),
        }
    }

    async fn scan(&self) -> DiscoveredFiles {
        let found = self.scanner.scan_async().await;
        if self.config.debug {
            info!(
                "[fakepoints] found {} fakepoint file(s) under {}",
                found.len(),
                self.config.workspace_root.display()
            );
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn test_resolve_id() {
        let plugin = FakepointsPlugin::new(FakepointsConfig::new("/repo")).unwrap();

        assert_eq!(plugin.name(), "fakepoints");
        assert_eq!(
            plugin.resolve_id("virtual:fakepoints"),
            Some("\0virtual:fakepoints")
        );
        assert_eq!(plugin.resolve_id("./other.ts"), None);
        assert_eq!(plugin.resolve_id("\0virtual:fakepoints"), None);
    }

    #[tokio::test]
    async fn test_load_ignores_other_ids() {
        let plugin = FakepointsPlugin::new(FakepointsConfig::new("/repo")).unwrap();
        assert_eq!(plugin.load("virtual:fakepoints").await, None);
        assert_eq!(plugin.load("/repo/a.ts").await, None);
    }

    #[test]
    fn test_server_config() {
        let plain = FakepointsPlugin::new(FakepointsConfig::new("/repo")).unwrap();
        assert_eq!(plain.server_config(), None);

        let plugin = FakepointsPlugin::from_options(json!({
            "workspaceRoot": "/repo",
            "ignoreDirs": ["tests", "utils"],
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(plugin.server_config().unwrap()).unwrap(),
            json!({ "watch": { "ignored": ["**/tests/**", "**/utils/**"] } })
        );
    }

    #[test]
    fn test_bad_options_fail_at_construction() {
        assert!(FakepointsPlugin::from_options(json!({ "debug": 1 })).is_err());
        assert!(FakepointsPlugin::new(FakepointsConfig::new("/repo").with_file_pattern("")).is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_scan_warns_but_still_loads() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let plugin = FakepointsPlugin::new(FakepointsConfig::new(temp_dir.path())).unwrap();

        let code = plugin.load(RESOLVED_VIRTUAL_MODULE_ID).await.unwrap();

        assert!(!code.contains("import"));
        assert!(logs_contain("no fakepoint files matching"));
    }
}
