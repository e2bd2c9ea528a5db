//! # Fakepoints
//!
//! Build-tool plugin that finds "fakepoint" files across a workspace and
//! serves them as a single virtual module, restarting the host whenever a
//! fakepoint file is added or deleted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Fakepoints Plugin                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  FakepointsConfig ──► FileScanner ──► synthesize ──► load()    │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  BuildHost ◄── WatchCoordinator ◄── WatchEvent (add / unlink)  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fakepoints::{DevSession, FakepointsConfig};
//!
//! let session = DevSession::start(FakepointsConfig::new(".").ignore_dir("fixtures")).await?;
//! println!("{}", session.module());
//! session.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod fs_host;
pub mod host;
pub mod module;
pub mod plugin;
pub mod registry;
pub mod scanner;
pub mod session;
pub mod watch;

pub use config::{FakepointsConfig, ScanConfig};
pub use error::{FakepointError, Result, ScanError};
pub use event::{WatchEvent, WatchEventKind};
pub use fs_host::FsHost;
pub use host::BuildHost;
pub use module::{
    EmptyResultWarning, RESOLVED_VIRTUAL_MODULE_ID, VIRTUAL_MODULE_ID, VirtualModuleSource,
    synthesize,
};
pub use plugin::{FakepointsPlugin, ServerConfigFragment};
pub use registry::FakepointRegistry;
pub use scanner::{DiscoveredFiles, FileScanner};
pub use session::DevSession;
pub use watch::{RestartReason, WatchCoordinator};
