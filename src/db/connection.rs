use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{RecordError, Result};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "database.db";

/// Open the database file, creating its parent directory and the `students`
/// table if either is missing. Every failure here means the storage is
/// unreachable, so they all map to [`RecordError::StorageUnavailable`].
pub(crate) fn open_connection(path: &Path) -> Result<Connection> {
    let unavailable = |source: Box<dyn std::error::Error + Send + Sync>| {
        RecordError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| unavailable(err.into()))?;
    }

    let conn = Connection::open(path).map_err(|err| unavailable(err.into()))?;
    ensure_schema(&conn).map_err(|err| unavailable(err.into()))?;
    debug!(path = %path.display(), "opened student database");
    Ok(conn)
}

/// Create the `students` table. `AUTOINCREMENT` keeps SQLite from handing a
/// deleted id to a new row.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            course TEXT,
            mobile TEXT
        )",
        [],
    )?;
    Ok(())
}

/// Resolve the default database path inside the user's home.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let base_dirs =
        BaseDirs::new().ok_or_else(|| anyhow::anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_directories_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("students.db");

        let conn = open_connection(&path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'students'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert!(path.exists());
        assert_eq!(tables, 1);
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn unreachable_path_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = open_connection(&blocker.join("students.db")).unwrap_err();
        assert!(matches!(err, RecordError::StorageUnavailable { .. }));
    }
}
