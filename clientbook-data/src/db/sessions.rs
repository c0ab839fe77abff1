use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::users::User;
use crate::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: Option<i64>,
    pub created_at: String,
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

/// Create a fresh anonymous session with a random token.
pub fn create(conn: &Connection) -> Result<Session> {
    let token = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, NULL, ?2)",
        params![token, now],
    )?;
    Ok(Session {
        token,
        user_id: None,
        created_at: now,
    })
}

/// Look up a session by its cookie token.
pub fn find(conn: &Connection, token: &str) -> Result<Option<Session>> {
    conn.query_row(
        "SELECT token, user_id, created_at FROM sessions WHERE token = ?1",
        params![token],
        |row| {
            Ok(Session {
                token: row.get(0)?,
                user_id: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(DataError::from)
}

/// Mark a session as logged in.
pub fn attach_user(conn: &Connection, token: &str, user_id: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE sessions SET user_id = ?1 WHERE token = ?2",
        params![user_id, token],
    )?;
    if changed == 0 {
        return Err(DataError::not_found("session", token));
    }
    Ok(())
}

/// Remove a session. Logging out of an already-gone session is not an error.
pub fn delete(conn: &Connection, token: &str) -> Result<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// The logged-in user for a session token, if any.
pub fn current_user(conn: &Connection, token: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT u.id, u.name, u.email, u.password_hash, u.created_at
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1",
        params![token],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(DataError::from)
}

/// Queue a flash message for the session.
pub fn push_flash(conn: &Connection, token: &str, category: &str, message: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO flashes (session_token, category, message, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![token, category, message, now],
    )?;
    Ok(())
}

/// Drain the pending flash messages for a session, oldest first.
pub fn take_flashes(conn: &Connection, token: &str) -> Result<Vec<Flash>> {
    let mut stmt = conn.prepare(
        "SELECT category, message FROM flashes WHERE session_token = ?1 ORDER BY id",
    )?;
    let flashes = stmt
        .query_map(params![token], |row| {
            Ok(Flash {
                category: row.get(0)?,
                message: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    conn.execute("DELETE FROM flashes WHERE session_token = ?1", params![token])?;
    Ok(flashes)
}
