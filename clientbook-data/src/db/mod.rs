pub mod customers;
pub mod migrations;
pub mod sessions;
pub mod users;

use std::path::Path;

use rusqlite::Connection;

/// Open or create the SQLite database at the given path.
///
/// Sets WAL journal mode and enables foreign keys.
/// Creates parent directories if needed.
pub fn open_or_create(path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                Some(format!("Cannot create directory {}: {}", parent.display(), e)),
            )
        })?;
    }

    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Returns the default database path: `~/.local/share/clientbook/clientbook.db`
pub fn default_db_path() -> std::path::PathBuf {
    let data_dir = dirs::data_local_dir().expect("Could not determine local data directory");
    data_dir.join("clientbook").join("clientbook.db")
}

/// Create an in-memory database with migrations applied, for testing.
#[cfg(test)]
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.pragma_update(None, "foreign_keys", "ON").expect("enable foreign keys");
    migrations::migrate(&conn).expect("run migrations");
    conn
}
