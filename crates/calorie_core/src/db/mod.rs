//! Tracker database: connection bootstrap and schema versioning.
//!
//! A connection handed out by this module has foreign keys enforced and the
//! schema migrated to [`migrations::latest_version`]; cascade rules live in
//! the schema, not in application code.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating a tracker database.
#[derive(Debug)]
pub enum DbError {
    /// The database at `target` could not be opened at all.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// A statement failed on an already open connection.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build of the tracker.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The built-in migration list is not strictly increasing.
    MigrationOrder { previous: u32, next: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open database {target}: {source}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MigrationOrder { previous, next } => write!(
                f,
                "migration {next} is registered after migration {previous}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MigrationOrder { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
