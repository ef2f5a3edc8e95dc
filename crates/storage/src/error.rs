use thiserror::Error;

/// Why the backing medium could not be opened or prepared.
#[derive(Debug, Error)]
pub enum UnavailableCause {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] UnavailableCause),

    #[error("schema not ready: ensure_schema has not succeeded on this handle")]
    SchemaNotReady,

    #[error("write failed: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    #[error("read failed: {0}")]
    ReadFailed(#[source] rusqlite::Error),
}

impl StorageError {
    pub fn unavailable(cause: impl Into<UnavailableCause>) -> Self {
        Self::Unavailable(cause.into())
    }

    /// True for failures that make every later call on the handle fail too.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
