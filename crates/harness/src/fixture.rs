use dermlog_core::{RecordId, ScanRecord};
use dermlog_engine::{EngineError, ScanLog, StoreConfig};
use std::path::PathBuf;

use tempfile::TempDir;

const DB_FILE: &str = "scanned_data.db";

/// A `ScanLog` with its schema already ensured, backed either by memory or
/// by a file in a private temporary directory.
pub struct TestLog {
    pub log: ScanLog,
    dir: Option<TempDir>,
}

impl TestLog {
    pub async fn in_memory() -> Result<Self, EngineError> {
        let log = ScanLog::open(StoreConfig::in_memory()).await?;
        log.ensure_schema().await?;
        Ok(Self { log, dir: None })
    }

    pub async fn on_disk() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = ScanLog::open(StoreConfig::file(dir.path().join(DB_FILE))).await?;
        log.ensure_schema().await?;
        Ok(Self {
            log,
            dir: Some(dir),
        })
    }

    /// Database file backing this log, if it is file-backed.
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.path().join(DB_FILE))
    }

    /// Closes the current handle and opens a fresh one on the same file.
    /// In-memory logs lose their contents.
    pub async fn reopen(self) -> Result<Self, EngineError> {
        let config = match &self.dir {
            Some(dir) => StoreConfig::file(dir.path().join(DB_FILE)),
            None => StoreConfig::in_memory(),
        };
        self.log.close().await?;
        let log = ScanLog::open(config).await?;
        log.ensure_schema().await?;
        Ok(Self { log, dir: self.dir })
    }

    /// Insert several drafts in order and return their ids.
    pub async fn seed(&self, drafts: Vec<ScanRecord>) -> Result<Vec<RecordId>, EngineError> {
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            ids.push(self.log.insert(draft).await?);
        }
        Ok(ids)
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<ScanRecord>, EngineError> {
        let records = self.log.fetch_all().await?;
        Ok(records.into_iter().find(|r| r.id == Some(id)))
    }
}
