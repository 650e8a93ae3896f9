//! Connection handle shared by the SQLite repositories.
//!
//! # Invariants
//! - Every repository write goes through [`Session::execute`].
//! - A session opened from a [`UnitOfWork`] records the first constraint
//!   violation it sees, even when the caller swallows the returned error.

use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, Params, Transaction};
use std::cell::RefCell;
use std::ops::Deref;

/// Borrowed connection plus the violation slot of the enclosing unit, if any.
#[derive(Clone, Copy)]
pub struct Session<'conn> {
    conn: &'conn Connection,
    violation: Option<&'conn RefCell<Option<RepoError>>>,
}

impl Session<'_> {
    /// Runs one write statement and classifies its failure.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> RepoResult<usize> {
        self.conn
            .execute(sql, params)
            .map_err(|err| self.observe(RepoError::from(err)))
    }

    /// Rejects NaN and infinities before they reach a REAL column.
    ///
    /// SQLite binds NaN as NULL, which would otherwise surface as a
    /// missing field for a value the caller did supply.
    pub fn ensure_finite(
        &self,
        table: &str,
        column: &str,
        value: impl Into<Option<f64>>,
    ) -> RepoResult<()> {
        match value.into() {
            Some(number) if !number.is_finite() => Err(self.observe(RepoError::CheckViolation(
                format!("{table}.{column} must be a finite number"),
            ))),
            _ => Ok(()),
        }
    }

    fn observe(&self, err: RepoError) -> RepoError {
        if let Some(slot) = self.violation {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = err.clone_violation();
            }
        }
        err
    }
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl<'conn> From<&'conn Connection> for Session<'conn> {
    fn from(conn: &'conn Connection) -> Self {
        Self {
            conn,
            violation: None,
        }
    }
}

impl<'unit> From<&'unit UnitOfWork<'_>> for Session<'unit> {
    fn from(unit: &'unit UnitOfWork<'_>) -> Self {
        Self {
            conn: &unit.tx,
            violation: Some(&unit.violation),
        }
    }
}

/// One open transaction handed to a [`with_transaction`] closure.
///
/// It does not expose the raw connection; repositories built from it share
/// its violation slot.
///
/// [`with_transaction`]: crate::repo::transaction::with_transaction
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    violation: RefCell<Option<RepoError>>,
}

impl<'conn> UnitOfWork<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self {
            tx,
            violation: RefCell::new(None),
        }
    }

    /// Whether a statement in this unit already failed on a constraint.
    pub fn is_poisoned(&self) -> bool {
        self.violation.borrow().is_some()
    }

    pub(crate) fn into_parts(self) -> (Transaction<'conn>, Option<RepoError>) {
        (self.tx, self.violation.into_inner())
    }
}
