//! Scoped unit-of-work helper.
//!
//! # Invariants
//! - The closure's writes are committed together or rolled back together.
//! - A constraint violation inside the unit rolls it back even if the
//!   closure caught the error and returned `Ok`.
//! - A failed unit leaves the connection outside any transaction, so the
//!   next write on the same session starts clean.

use crate::repo::session::UnitOfWork;
use crate::repo::RepoResult;
use log::{error, warn};
use rusqlite::{Connection, TransactionBehavior};

/// Runs `work` inside one immediate transaction on `conn`.
///
/// Repositories built from the unit (`try_new(unit)`) participate in the
/// same transaction. The first constraint violation any of them hits is
/// returned in place of the closure's result.
pub fn with_transaction<T, F>(conn: &mut Connection, work: F) -> RepoResult<T>
where
    F: FnOnce(&UnitOfWork<'_>) -> RepoResult<T>,
{
    let unit = UnitOfWork::new(conn.transaction_with_behavior(TransactionBehavior::Immediate)?);
    let outcome = work(&unit);
    let (tx, violation) = unit.into_parts();

    let outcome = match (outcome, violation) {
        (Ok(_), Some(violation)) => {
            warn!(
                "event=tx_rollback module=repo status=error error_code=violation_ignored error={violation}"
            );
            Err(violation)
        }
        (outcome, _) => outcome,
    };

    match outcome {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!("event=tx_rollback module=repo status=error error={err}");
            if let Err(rollback_err) = tx.rollback() {
                error!(
                    "event=tx_rollback module=repo status=error error_code=rollback_failed error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}
