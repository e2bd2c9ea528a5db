//! The capabilities the plugin needs from its host build tool.

use std::path::Path;

use async_trait::async_trait;

use crate::watch::RestartReason;

/// Host build tool as seen by the plugin.
///
/// Module resolution and loading flow the other way (the host calls
/// [`crate::FakepointsPlugin::resolve_id`] and
/// [`crate::FakepointsPlugin::load`]), so only the watcher and the restart
/// live here. Watcher events are pushed into
/// [`crate::FakepointsPlugin::handle_watch_event`] one at a time.
#[async_trait]
pub trait BuildHost: Send + Sync {
    /// Register a path with the host watcher. Must be idempotent.
    fn watcher_add(&self, path: &Path);

    /// Restart the host so the virtual module is loaded again.
    async fn restart(&self, reason: RestartReason) -> anyhow::Result<()>;
}
