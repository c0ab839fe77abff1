use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use minijinja::Environment;
use rusqlite::Connection;
use tokio::sync::{Mutex, MutexGuard};

use clientbook_data::db;

use crate::templates;

/// Shared application state accessible by all handlers.
///
/// A single connection behind a mutex gives the single-writer model the
/// app needs; each request holds the lock only for its own queries.
pub struct AppState {
    db: Mutex<Connection>,
    templates: Environment<'static>,
}

impl AppState {
    /// Open (or create) the database at `path`, run migrations, and load
    /// the embedded template set.
    pub fn open(path: &Path) -> anyhow::Result<Arc<Self>> {
        let conn = db::open_or_create(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        db::migrations::migrate(&conn).context("failed to run migrations")?;

        let templates = templates::build_env().context("failed to load templates")?;

        Ok(Arc::new(Self {
            db: Mutex::new(conn),
            templates,
        }))
    }

    pub async fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().await
    }

    pub fn templates(&self) -> &Environment<'static> {
        &self.templates
    }
}
