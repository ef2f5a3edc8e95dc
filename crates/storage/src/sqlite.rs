use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::types::ValueRef;

use dermlog_core::{
    PersistedRow, RecordId, ScanRecord,
    codec::{self, FLAG_FALSE},
};

use crate::error::StorageError;
use crate::schema::{self, DEFAULT_BUSY_TIMEOUT};
use crate::traits::ScanStore;

/// Stand-in for a flag column holding text, a blob, or a fractional real.
/// Anything but `1` decodes to `false`, so this only has to be "not 1" and
/// "not 0" so that it shows up as an anomaly.
const UNREADABLE_FLAG: i64 = -1;

const SELECT_COLUMNS: &str = "SELECT id, imageByteArray, bodyPartName, bodyPartType, risk, assymetry, irregularBorders, variedColors, diameterLargerThanSix, selectedSkinColor, analyzed, timeStamp, isSelected, isFromselfExam FROM scanned_data";

#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    pub busy_timeout: Duration,
    /// Create missing parent directories of a file-backed database.
    pub create_dirs: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            create_dirs: true,
        }
    }
}

pub struct SqliteStorage {
    conn: Connection,
    schema_ready: bool,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with(path, OpenOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if options.create_dirs {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StorageError::unavailable)?;
                }
            }
        }
        let conn = Connection::open(path).map_err(StorageError::unavailable)?;
        schema::configure(&conn, options.busy_timeout)?;
        tracing::info!(path = %path.display(), "opened record store");
        Ok(Self {
            conn,
            schema_ready: false,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::unavailable)?;
        schema::configure(&conn, DEFAULT_BUSY_TIMEOUT)?;
        Ok(Self {
            conn,
            schema_ready: false,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Releases the connection, reporting a failed final flush.
    pub fn close(self) -> Result<(), StorageError> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::WriteFailed(e))
    }

    fn require_schema(&self) -> Result<(), StorageError> {
        if self.schema_ready {
            Ok(())
        } else {
            Err(StorageError::SchemaNotReady)
        }
    }
}

fn flag_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<i64> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(n) => n,
        ValueRef::Real(f) if f.fract() == 0.0 => f as i64,
        ValueRef::Null => FLAG_FALSE,
        ValueRef::Real(_) | ValueRef::Text(_) | ValueRef::Blob(_) => UNREADABLE_FLAG,
    })
}

/// Reads any scalar as text, the way it would print.
fn text_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    })
}

fn optional_text_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<String>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        _ => text_column(row, idx).map(Some),
    }
}

/// `None` when the stored value cannot be read as epoch millis.
fn timestamp_value(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(n) => Some(n),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        ValueRef::Null => Some(0),
        ValueRef::Blob(_) => None,
    }
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<i64> {
    match timestamp_value(row.get_ref(idx)?) {
        Some(ts) => Ok(ts),
        None => {
            tracing::warn!(
                id = ?row.get::<_, i64>(0).ok(),
                column = "timeStamp",
                "unreadable timestamp, reading as 0"
            );
            Ok(0)
        }
    }
}

fn read_row(row: &rusqlite::Row) -> rusqlite::Result<PersistedRow> {
    Ok(PersistedRow {
        id: Some(RecordId::from_i64(row.get(0)?)),
        image_data: optional_text_column(row, 1)?,
        body_part_name: text_column(row, 2)?,
        body_part_type: text_column(row, 3)?,
        risk: text_column(row, 4)?,
        has_asymmetry: flag_column(row, 5)?,
        has_irregular_borders: flag_column(row, 6)?,
        has_varied_colors: flag_column(row, 7)?,
        diameter_over_6mm: flag_column(row, 8)?,
        selected_skin_color: text_column(row, 9)?,
        analyzed: text_column(row, 10)?,
        timestamp: timestamp_column(row, 11)?,
        is_selected: flag_column(row, 12)?,
        self_exam_flag: text_column(row, 13)?,
    })
}

fn decode_logged(row: PersistedRow) -> ScanRecord {
    let anomalies = row.flag_anomalies();
    if !anomalies.is_empty() {
        tracing::warn!(
            id = ?row.id,
            columns = ?anomalies,
            "flag column outside {{0,1}}, decoding as false"
        );
    }
    codec::decode(row)
}

impl ScanStore for SqliteStorage {
    fn ensure_schema(&mut self) -> Result<(), StorageError> {
        schema::ensure_schema(&self.conn)?;
        self.schema_ready = true;
        Ok(())
    }

    fn is_schema_ready(&self) -> bool {
        self.schema_ready
    }

    fn insert(&mut self, record: &ScanRecord) -> Result<RecordId, StorageError> {
        self.require_schema()?;
        let row = codec::encode(record);
        self.conn
            .execute(
                "INSERT INTO scanned_data (imageByteArray, bodyPartName, bodyPartType, risk, assymetry, irregularBorders, variedColors, diameterLargerThanSix, selectedSkinColor, analyzed, timeStamp, isSelected, isFromselfExam) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                rusqlite::params![
                    row.image_data,
                    row.body_part_name,
                    row.body_part_type,
                    row.risk,
                    row.has_asymmetry,
                    row.has_irregular_borders,
                    row.has_varied_colors,
                    row.diameter_over_6mm,
                    row.selected_skin_color,
                    row.analyzed,
                    row.timestamp,
                    row.is_selected,
                    row.self_exam_flag,
                ],
            )
            .map_err(StorageError::WriteFailed)?;
        let id = RecordId::from_i64(self.conn.last_insert_rowid());
        tracing::debug!(%id, "inserted record");
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<ScanRecord>, StorageError> {
        self.require_schema()?;
        let mut stmt = self
            .conn
            .prepare(SELECT_COLUMNS)
            .map_err(StorageError::ReadFailed)?;
        let rows = stmt
            .query_map([], read_row)
            .map_err(StorageError::ReadFailed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::ReadFailed)?;
        tracing::debug!(count = rows.len(), "fetched records");
        Ok(rows.into_iter().map(decode_logged).collect())
    }

    fn fetch_by_id(&self, id: RecordId) -> Result<Option<ScanRecord>, StorageError> {
        self.require_schema()?;
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .map_err(StorageError::ReadFailed)?;
        let mut rows = stmt
            .query_map([id.as_i64()], read_row)
            .map_err(StorageError::ReadFailed)?;

        match rows.next() {
            Some(Ok(row)) => Ok(Some(decode_logged(row))),
            Some(Err(e)) => Err(StorageError::ReadFailed(e)),
            None => Ok(None),
        }
    }

    fn update(&mut self, id: RecordId, record: &ScanRecord) -> Result<usize, StorageError> {
        self.require_schema()?;
        let row = codec::encode(record);
        let affected = self
            .conn
            .execute(
                "UPDATE scanned_data SET imageByteArray = ?1, bodyPartName = ?2, bodyPartType = ?3, risk = ?4, assymetry = ?5, irregularBorders = ?6, variedColors = ?7, diameterLargerThanSix = ?8, selectedSkinColor = ?9, analyzed = ?10, timeStamp = ?11, isSelected = ?12, isFromselfExam = ?13 WHERE id = ?14",
                rusqlite::params![
                    row.image_data,
                    row.body_part_name,
                    row.body_part_type,
                    row.risk,
                    row.has_asymmetry,
                    row.has_irregular_borders,
                    row.has_varied_colors,
                    row.diameter_over_6mm,
                    row.selected_skin_color,
                    row.analyzed,
                    row.timestamp,
                    row.is_selected,
                    row.self_exam_flag,
                    id.as_i64(),
                ],
            )
            .map_err(StorageError::WriteFailed)?;
        tracing::debug!(%id, affected, "updated record");
        Ok(affected)
    }

    fn delete_by_id(&mut self, id: RecordId) -> Result<usize, StorageError> {
        self.require_schema()?;
        let affected = self
            .conn
            .execute("DELETE FROM scanned_data WHERE id = ?1", [id.as_i64()])
            .map_err(StorageError::WriteFailed)?;
        tracing::debug!(%id, affected, "deleted record");
        Ok(affected)
    }

    fn count(&self) -> Result<u64, StorageError> {
        self.require_schema()?;
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scanned_data", [], |row| row.get(0))
            .map_err(StorageError::ReadFailed)?;
        Ok(count as u64)
    }
}
