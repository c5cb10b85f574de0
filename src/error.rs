// src/error.rs

use std::fmt;

/// Storage-layer failure.
///
/// Logical rejections (blank credentials, duplicate exercise id, unknown user)
/// are not errors: the repositories report them as `None`.
#[derive(Debug)]
pub enum DbError {
    /// The database handle has been closed.
    NotOpen,

    /// Driver, I/O or constraint failure reported by SQLite.
    Storage(String),

    /// A stored value could not be turned back into a model value.
    Decode(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::NotOpen => write!(f, "database connection is not open"),
            DbError::Storage(msg) => write!(f, "storage error: {}", msg),
            DbError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for DbError {}

/// Converts `sqlx::Error` into `DbError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => DbError::NotOpen,
            other => DbError::Storage(other.to_string()),
        }
    }
}
