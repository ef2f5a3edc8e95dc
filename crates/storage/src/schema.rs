use std::time::Duration;

use rusqlite::Connection;

use crate::error::StorageError;

pub const TABLE_NAME: &str = "scanned_data";

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Connection settings applied once when the handle is opened.
pub fn configure(conn: &Connection, busy_timeout: Duration) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )
    .map_err(StorageError::unavailable)?;
    conn.busy_timeout(busy_timeout)
        .map_err(StorageError::unavailable)?;
    Ok(())
}

/// Creates the record table when it is missing. Safe to run on every start;
/// an existing table and its rows are left untouched.
pub fn ensure_schema(conn: &Connection) -> Result<(), StorageError> {
    let existed = table_exists(conn)?;
    conn.execute_batch(SCHEMA_SQL)
        .map_err(StorageError::unavailable)?;
    if !existed {
        tracing::info!(table = TABLE_NAME, "created record table");
    }
    Ok(())
}

pub fn table_exists(conn: &Connection) -> Result<bool, StorageError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [TABLE_NAME],
            |row| row.get(0),
        )
        .map_err(StorageError::unavailable)?;
    Ok(count > 0)
}

// Column names match databases written by the original mobile client,
// including the `assymetry` spelling.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS scanned_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imageByteArray TEXT,
    bodyPartName TEXT,
    bodyPartType TEXT,
    risk TEXT,
    assymetry INTEGER,
    irregularBorders INTEGER,
    variedColors INTEGER,
    diameterLargerThanSix INTEGER,
    selectedSkinColor TEXT,
    analyzed TEXT,
    timeStamp INTEGER,
    isSelected INTEGER,
    isFromselfExam TEXT
);
";
