//! Data access layer over the tracker schema.
//!
//! # Responsibility
//! - One repository contract plus SQLite implementation per entity family.
//! - Translate SQLite constraint failures into semantic error kinds.
//!
//! # Invariants
//! - Repositories perform no integrity checks of their own; uniqueness,
//!   required columns, references and cascades are enforced by the schema.
//! - Every write is a single statement, so a cascade either fully applies or
//!   not at all. Multi-statement units go through [`transaction`].
//! - Repositories write through a [`session::Session`], never a bare
//!   connection.
//! - Updates/deletes touching zero rows return `RepoError::NotFound`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::ffi;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity_repo;
pub mod meal_repo;
pub mod person_repo;
pub mod portion_repo;
pub mod record_repo;
pub mod session;
pub mod transaction;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every entity family.
#[derive(Debug)]
pub enum RepoError {
    /// Primary key already exists.
    Duplicate { table: String },
    /// A required column was left unset.
    MissingField { table: String, column: String },
    /// A foreign key points at a row that does not exist.
    DanglingReference,
    /// A CHECK constraint (length bound) rejected the row.
    CheckViolation(String),
    /// Operation required an existing row and none matched.
    NotFound { entity: &'static str, key: String },
    /// Any other storage failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Copy of a constraint violation; `None` for every other kind.
    pub(crate) fn clone_violation(&self) -> Option<Self> {
        match self {
            Self::Duplicate { table } => Some(Self::Duplicate {
                table: table.clone(),
            }),
            Self::MissingField { table, column } => Some(Self::MissingField {
                table: table.clone(),
                column: column.clone(),
            }),
            Self::DanglingReference => Some(Self::DanglingReference),
            Self::CheckViolation(detail) => Some(Self::CheckViolation(detail.clone())),
            _ => None,
        }
    }

    /// HTTP status a presentation layer should answer with.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Duplicate { .. } => 409,
            Self::MissingField { .. } | Self::DanglingReference | Self::CheckViolation(_) => 400,
            Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InvalidData(_) => 500,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { table } => write!(f, "duplicate primary key in `{table}`"),
            Self::MissingField { table, column } => {
                write!(f, "required field `{table}.{column}` is missing")
            }
            Self::DanglingReference => write!(f, "referenced row does not exist"),
            Self::CheckViolation(detail) => write!(f, "check constraint failed: {detail}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => classify_sqlite_error(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        classify_sqlite_error(value)
    }
}

fn classify_sqlite_error(err: rusqlite::Error) -> RepoError {
    let constraint = match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some((failure.extended_code, message.clone().unwrap_or_default()))
        }
        _ => None,
    };
    let Some((extended_code, detail)) = constraint else {
        return RepoError::Db(DbError::Sqlite(err));
    };

    match extended_code {
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
            let (table, _) = constraint_target(&detail);
            RepoError::Duplicate { table }
        }
        ffi::SQLITE_CONSTRAINT_NOTNULL => {
            let (table, column) = constraint_target(&detail);
            RepoError::MissingField { table, column }
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepoError::DanglingReference,
        ffi::SQLITE_CONSTRAINT_CHECK => RepoError::CheckViolation(constraint_subject(&detail)),
        _ => RepoError::Db(DbError::Sqlite(err)),
    }
}

/// Text after `constraint failed: `.
fn constraint_subject(detail: &str) -> String {
    detail
        .split_once("failed: ")
        .map_or(detail, |(_, subject)| subject)
        .trim()
        .to_string()
}

/// First `table.column` pair named by a constraint message.
fn constraint_target(detail: &str) -> (String, String) {
    let subject = constraint_subject(detail);
    let first = subject.split(',').next().unwrap_or_default().trim();
    match first.split_once('.') {
        Some((table, column)) => (table.to_string(), column.to_string()),
        None => (first.to_string(), String::new()),
    }
}

/// Verifies the connection is migrated and carries the given tables.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{constraint_subject, constraint_target, RepoError};

    #[test]
    fn constraint_target_reads_first_pair() {
        assert_eq!(
            constraint_target("NOT NULL constraint failed: activity.name"),
            ("activity".to_string(), "name".to_string())
        );
        assert_eq!(
            constraint_target(
                "UNIQUE constraint failed: meal_record.person_id, meal_record.meal_id"
            ),
            ("meal_record".to_string(), "person_id".to_string())
        );
    }

    #[test]
    fn constraint_subject_strips_prefix() {
        assert_eq!(
            constraint_subject("CHECK constraint failed: length(id) <= 128"),
            "length(id) <= 128"
        );
        assert_eq!(constraint_subject("odd message"), "odd message");
    }

    #[test]
    fn status_hint_maps_error_kinds() {
        assert_eq!(RepoError::not_found("person", "p1").status_hint(), 404);
        assert_eq!(
            RepoError::Duplicate {
                table: "person".to_string()
            }
            .status_hint(),
            409
        );
        assert_eq!(RepoError::DanglingReference.status_hint(), 400);
        assert_eq!(RepoError::InvalidData("x".to_string()).status_hint(), 500);
    }
}
