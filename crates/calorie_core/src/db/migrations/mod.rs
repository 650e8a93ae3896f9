//! Tracker schema history.
//!
//! Each entry is one SQL file applied at most once per database. The applied
//! version lives in `PRAGMA user_version`; pending steps run in a single
//! transaction so a database is never left between two versions.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "portions",
        sql: include_str!("0002_portions.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Fails with `UnsupportedSchemaVersion` when the file is newer than this
/// build and with `MigrationOrder` when the step list itself is malformed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    check_order(SCHEMA_STEPS)?;

    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    info!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

fn check_order(steps: &[SchemaStep]) -> DbResult<()> {
    let mut previous = 0;
    for step in steps {
        if step.version <= previous {
            return Err(DbError::MigrationOrder {
                previous,
                next: step.version,
            });
        }
        previous = step.version;
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{check_order, latest_version, SchemaStep, SCHEMA_STEPS};
    use crate::db::DbError;

    fn step(version: u32) -> SchemaStep {
        SchemaStep {
            version,
            name: "test",
            sql: "",
        }
    }

    #[test]
    fn built_in_steps_are_strictly_increasing() {
        assert!(check_order(SCHEMA_STEPS).is_ok());
        assert_eq!(latest_version(), 2);
    }

    #[test]
    fn repeated_version_is_rejected() {
        let err = check_order(&[step(1), step(2), step(2)]).unwrap_err();
        assert!(matches!(
            err,
            DbError::MigrationOrder {
                previous: 2,
                next: 2
            }
        ));
    }

    #[test]
    fn version_going_backwards_is_rejected() {
        let err = check_order(&[step(1), step(3), step(2)]).unwrap_err();
        assert!(matches!(
            err,
            DbError::MigrationOrder {
                previous: 3,
                next: 2
            }
        ));
    }

    #[test]
    fn version_zero_is_rejected() {
        assert!(check_order(&[step(0)]).is_err());
    }
}
