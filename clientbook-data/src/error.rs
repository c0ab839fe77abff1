use thiserror::Error;

/// Error types for persistence operations.
/// Used by both the library and the web crate.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{what} '{key}' not found")]
    NotFound { what: &'static str, key: String },

    #[error("a record with this {0} already exists")]
    Duplicate(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl DataError {
    pub fn not_found(what: &'static str, key: impl ToString) -> Self {
        DataError::NotFound {
            what,
            key: key.to_string(),
        }
    }

    /// True when the error is a UNIQUE constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DataError::Duplicate(_))
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
