use rusqlite::Connection;

/// Run all pending migrations on the database.
///
/// Uses `PRAGMA user_version` to track which migrations have been applied.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        migrate_v0_to_v1(conn)?;
    }

    Ok(())
}

fn migrate_v0_to_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE customers (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            phone       TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE users (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE sessions (
            token       TEXT PRIMARY KEY,
            user_id     INTEGER REFERENCES users,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE flashes (
            id              INTEGER PRIMARY KEY,
            session_token   TEXT NOT NULL REFERENCES sessions ON DELETE CASCADE,
            category        TEXT NOT NULL,
            message         TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX idx_flashes_session ON flashes(session_token);

        PRAGMA user_version = 1;
        ",
    )?;
    Ok(())
}
