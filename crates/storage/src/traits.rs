use dermlog_core::{RecordId, ScanRecord};

use crate::error::StorageError;

/// Synchronous record gateway over a single backing handle.
///
/// Every call other than `ensure_schema` fails with
/// [`StorageError::SchemaNotReady`] until `ensure_schema` has succeeded on
/// the same handle.
pub trait ScanStore {
    fn ensure_schema(&mut self) -> Result<(), StorageError>;

    fn is_schema_ready(&self) -> bool;

    fn insert(&mut self, record: &ScanRecord) -> Result<RecordId, StorageError>;

    /// Rows in storage-native order; no ordering is promised.
    fn fetch_all(&self) -> Result<Vec<ScanRecord>, StorageError>;

    fn fetch_by_id(&self, id: RecordId) -> Result<Option<ScanRecord>, StorageError>;

    /// Overwrites the row at `id` and returns the number of rows touched.
    /// A missing `id` touches nothing and is not an error.
    fn update(&mut self, id: RecordId, record: &ScanRecord) -> Result<usize, StorageError>;

    /// Hard delete. A missing `id` touches nothing and is not an error.
    fn delete_by_id(&mut self, id: RecordId) -> Result<usize, StorageError>;

    fn count(&self) -> Result<u64, StorageError>;
}
