use std::path::PathBuf;
use std::time::Duration;

use dermlog_storage::sqlite::OpenOptions;
use serde::Deserialize;

/// How the process-wide store handle is opened. Built by the embedding
/// application; nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. `None` keeps everything in memory.
    pub path: Option<PathBuf>,
    pub busy_timeout_ms: u32,
    pub create_dirs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5000,
            create_dirs: true,
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        OpenOptions {
            busy_timeout: Duration::from_millis(u64::from(self.busy_timeout_ms)),
            create_dirs: self.create_dirs,
        }
    }
}
