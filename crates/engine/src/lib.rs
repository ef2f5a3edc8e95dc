pub mod config;
pub mod error;
pub mod logging;

pub use config::StoreConfig;
pub use error::EngineError;

use std::sync::{Arc, Mutex};

use dermlog_core::{
    RecordFilter, RecordId, ScanRecord, SortDirection,
    query::{filter_records, sort_by_timestamp},
};
use dermlog_storage::{ScanStore, SqliteStorage, StorageError};

/// Asynchronous gateway over the single process-wide store handle.
///
/// Every operation runs the blocking SQLite call on tokio's blocking pool and
/// resolves when it finishes; the caller's task is never blocked on I/O.
/// Clones share the same handle, and calls are serialised on it. Operations
/// are independent: nothing spans more than one call atomically.
#[derive(Clone)]
pub struct ScanLog {
    storage: Arc<Mutex<SqliteStorage>>,
}

impl ScanLog {
    pub async fn open(config: StoreConfig) -> Result<Self, EngineError> {
        let storage = tokio::task::spawn_blocking(move || match &config.path {
            Some(path) => SqliteStorage::open_with(path, config.open_options()),
            None => SqliteStorage::open_in_memory(),
        })
        .await
        .map_err(|e| EngineError::TaskJoin(e.to_string()))??;
        Ok(Self::from_storage(storage))
    }

    pub fn from_storage(storage: SqliteStorage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Runs `f` against the handle on the blocking pool.
    async fn with_storage<F, R>(&self, f: F) -> Result<R, EngineError>
    where
        F: FnOnce(&mut SqliteStorage) -> Result<R, StorageError> + Send + 'static,
        R: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let result = tokio::task::spawn_blocking(move || {
            // A panic mid-call cannot leave the connection half-used; recover it.
            let mut guard = storage
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut guard)
        })
        .await
        .map_err(|e| EngineError::TaskJoin(e.to_string()))?;
        Ok(result?)
    }

    /// Creates the record table if needed. Call once at startup before any
    /// other operation.
    pub async fn ensure_schema(&self) -> Result<(), EngineError> {
        self.with_storage(|s| s.ensure_schema()).await
    }

    pub async fn insert(&self, record: ScanRecord) -> Result<RecordId, EngineError> {
        self.with_storage(move |s| s.insert(&record)).await
    }

    pub async fn fetch_all(&self) -> Result<Vec<ScanRecord>, EngineError> {
        self.with_storage(|s| s.fetch_all()).await
    }

    pub async fn fetch_by_id(&self, id: RecordId) -> Result<Option<ScanRecord>, EngineError> {
        self.with_storage(move |s| s.fetch_by_id(id)).await
    }

    /// Fetches every record and orders it by timestamp.
    pub async fn fetch_sorted(&self, direction: SortDirection) -> Result<Vec<ScanRecord>, EngineError> {
        let records = self.fetch_all().await?;
        Ok(sort_by_timestamp(records, direction))
    }

    pub async fn fetch_matching(
        &self,
        filter: RecordFilter,
        direction: SortDirection,
    ) -> Result<Vec<ScanRecord>, EngineError> {
        let records = self.fetch_all().await?;
        Ok(sort_by_timestamp(filter_records(records, &filter), direction))
    }

    /// Overwrites the record at `id`. An unknown `id` is a silent no-op; the
    /// caller can tell by fetching again.
    pub async fn update(&self, id: RecordId, record: ScanRecord) -> Result<(), EngineError> {
        let affected = self.with_storage(move |s| s.update(id, &record)).await?;
        if affected == 0 {
            tracing::debug!(%id, "update matched no record");
        }
        Ok(())
    }

    /// Hard delete. An unknown `id` is a silent no-op.
    pub async fn delete_by_id(&self, id: RecordId) -> Result<(), EngineError> {
        let affected = self.with_storage(move |s| s.delete_by_id(id)).await?;
        if affected == 0 {
            tracing::debug!(%id, "delete matched no record");
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, EngineError> {
        self.with_storage(|s| s.count()).await
    }

    /// Releases the handle. If other clones are still alive the connection
    /// stays open until the last of them is dropped.
    pub async fn close(self) -> Result<(), EngineError> {
        match Arc::try_unwrap(self.storage) {
            Ok(mutex) => {
                let storage = mutex
                    .into_inner()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                tokio::task::spawn_blocking(move || storage.close())
                    .await
                    .map_err(|e| EngineError::TaskJoin(e.to_string()))??;
                tracing::info!("closed record store");
            }
            Err(_) => {
                tracing::debug!("store handle still shared; leaving connection open");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, timestamp: i64) -> ScanRecord {
        ScanRecord {
            body_part_name: name.into(),
            risk: "Low".into(),
            timestamp,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn operations_before_schema_surface_schema_not_ready() {
        let log = ScanLog::open(StoreConfig::in_memory()).await.unwrap();
        let err = log.insert(draft("Arm", 1)).await.unwrap_err();
        assert!(matches!(err.storage(), Some(StorageError::SchemaNotReady)));
        let err = log.fetch_all().await.unwrap_err();
        assert!(matches!(err.storage(), Some(StorageError::SchemaNotReady)));
    }

    #[tokio::test]
    async fn clones_share_one_handle() {
        let log = ScanLog::open(StoreConfig::in_memory()).await.unwrap();
        log.ensure_schema().await.unwrap();
        let other = log.clone();
        other.insert(draft("Arm", 1)).await.unwrap();
        assert_eq!(log.count().await.unwrap(), 1);

        // Closing one clone leaves the other usable.
        log.close().await.unwrap();
        assert_eq!(other.fetch_all().await.unwrap().len(), 1);
        other.close().await.unwrap();
    }

    #[tokio::test]
    async fn fetch_matching_filters_then_sorts() {
        let log = ScanLog::open(StoreConfig::in_memory()).await.unwrap();
        log.ensure_schema().await.unwrap();
        for (name, ts) in [("Arm", 3), ("Leg", 2), ("Arm", 9), ("arm", 1)] {
            log.insert(draft(name, ts)).await.unwrap();
        }
        let arms = log
            .fetch_matching(RecordFilter::new().body_part("arm"), SortDirection::OldestFirst)
            .await
            .unwrap();
        let ts: Vec<i64> = arms.iter().map(|r| r.timestamp).collect();
        assert_eq!(ts, vec![1, 3, 9]);
    }
}
