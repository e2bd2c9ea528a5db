//! Shared helpers for the fakepoints integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use fakepoints::{BuildHost, RestartReason};

/// Records every watcher registration and restart request.
#[derive(Debug, Default)]
pub struct RecordingHost {
    watched: Mutex<Vec<PathBuf>>,
    restarts: Mutex<Vec<RestartReason>>,
    fail_restarts: bool,
}

impl RecordingHost {
    /// A host whose restarts always fail.
    pub fn failing() -> Self {
        Self {
            fail_restarts: true,
            ..Self::default()
        }
    }

    /// Paths passed to `watcher_add`, in call order.
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().clone()
    }

    /// Reasons passed to `restart`, in call order.
    pub fn restarts(&self) -> Vec<RestartReason> {
        self.restarts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildHost for RecordingHost {
    fn watcher_add(&self, path: &Path) {
        let mut watched = self.watched.lock().unwrap();
        if !watched.iter().any(|p| p == path) {
            watched.push(path.to_path_buf());
        }
    }

    async fn restart(&self, reason: RestartReason) -> anyhow::Result<()> {
        self.restarts.lock().unwrap().push(reason);
        if self.fail_restarts {
            anyhow::bail!("host refused to restart");
        }
        Ok(())
    }
}

pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "register(() => {});\n").unwrap();
}
