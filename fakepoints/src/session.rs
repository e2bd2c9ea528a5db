//! A dev session: plugin plus file-system host plus event loop.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::config::FakepointsConfig;
use crate::error::Result;
use crate::event::WatchEvent;
use crate::fs_host::{DEFAULT_WATCH_IGNORED, FsHost};
use crate::module::VIRTUAL_MODULE_ID;
use crate::plugin::FakepointsPlugin;
use crate::scanner::FileScanner;

/// Runs the plugin against the real file system.
///
/// Events are handled strictly one at a time. After each restart the
/// tracked files are resynced and the virtual module is loaded again, both
/// from a fresh scan.
pub struct DevSession {
    plugin: FakepointsPlugin,
    host: Arc<FsHost>,
    events: mpsc::Receiver<WatchEvent>,
    restarts: watch::Receiver<u64>,
    module: String,
}

impl DevSession {
    /// Build the plugin, start watching and load the module once.
    pub async fn start(mut config: FakepointsConfig) -> Result<Self> {
        config.workspace_root = tokio::fs::canonicalize(&config.workspace_root).await?;
        let mut plugin = FakepointsPlugin::new(config)?;

        let mut ignored: Vec<String> = DEFAULT_WATCH_IGNORED
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        if let Some(fragment) = plugin.server_config() {
            ignored.extend(fragment.watch.ignored);
        }

        let scanner = FileScanner::new(plugin.config().scan_config());
        let (host, events) = FsHost::start(&plugin.config().workspace_root, &ignored, scanner)?;
        let host = Arc::new(host);
        let restarts = host.subscribe_restarts();
        plugin.configure_server(host.clone()).await;

        let module = load_module(&plugin).await;
        info!("Dev session started");

        Ok(Self {
            plugin,
            host,
            events,
            restarts,
            module,
        })
    }

    /// Current virtual module source.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The plugin driven by this session.
    pub fn plugin(&self) -> &FakepointsPlugin {
        &self.plugin
    }

    /// The host driven by this session.
    pub fn host(&self) -> &Arc<FsHost> {
        &self.host
    }

    /// Handle the next watcher event. Returns `false` once the watcher is
    /// gone.
    pub async fn next(&mut self) -> Result<bool> {
        let Some(event) = self.events.recv().await else {
            return Ok(false);
        };

        self.handle(&event).await?;
        Ok(true)
    }

    /// Handle one event and reload the module if it caused a restart.
    pub async fn handle(&mut self, event: &WatchEvent) -> Result<()> {
        self.plugin.handle_watch_event(event).await?;

        if self.restarts.has_changed().unwrap_or(false) {
            let generation = *self.restarts.borrow_and_update();
            self.plugin.resync_watch().await;
            self.module = load_module(&self.plugin).await;
            debug!("Reloaded virtual module (generation {generation})");
        }
        Ok(())
    }

    /// Run until the watcher stops or a restart fails.
    pub async fn run(mut self) -> Result<()> {
        loop {
            match self.next().await {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    error!("Dev session stopped: {e}");
                    return Err(e);
                }
            }
        }
    }
}

async fn load_module(plugin: &FakepointsPlugin) -> String {
    match plugin.resolve_id(VIRTUAL_MODULE_ID) {
        Some(resolved) => plugin.load(resolved).await.unwrap_or_default(),
        None => String::new(),
    }
}
