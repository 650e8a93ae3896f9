//! Activity repository contract and SQLite implementation.
//!
//! # Invariants
//! - Activity ids are immutable; `update_activity` rewrites the other columns.
//! - Deleting an activity removes every record referencing it and nothing
//!   else.

use crate::model::activity::{Activity, NewActivity};
use crate::repo::session::Session;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

const ACTIVITY_ENTITY: &str = "activity";

const ACTIVITY_SELECT_SQL: &str = "SELECT
    id,
    name,
    intensity,
    description
FROM activity";

/// Repository interface for activity operations.
pub trait ActivityRepository {
    fn create_activity(&self, activity: &NewActivity) -> RepoResult<Activity>;
    fn get_activity(&self, id: &str) -> RepoResult<Option<Activity>>;
    fn list_activities(&self) -> RepoResult<Vec<Activity>>;
    fn update_activity(&self, activity: &Activity) -> RepoResult<()>;
    fn delete_activity(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: Session<'conn>,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Creates repository from a migrated connection or an open unit of work.
    pub fn try_new(conn: impl Into<Session<'conn>>) -> RepoResult<Self> {
        let conn = conn.into();
        ensure_connection_ready(&conn, &["activity"])?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create_activity(&self, activity: &NewActivity) -> RepoResult<Activity> {
        self.conn.execute(
            "INSERT INTO activity (
                id,
                name,
                intensity,
                description
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                activity.id.as_deref(),
                activity.name.as_deref(),
                activity.intensity,
                activity.description.as_deref(),
            ],
        )?;

        let id = activity.id.as_deref().unwrap_or_default();
        self.get_activity(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("activity `{id}` missing after insert")))
    }

    fn get_activity(&self, id: &str) -> RepoResult<Option<Activity>> {
        let activity = self
            .conn
            .query_row(
                &format!("{ACTIVITY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_activity_row,
            )
            .optional()?;
        Ok(activity)
    }

    fn list_activities(&self) -> RepoResult<Vec<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} ORDER BY id ASC;"))?;
        let activities = stmt
            .query_map([], parse_activity_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE activity
             SET
                name = ?2,
                intensity = ?3,
                description = ?4
             WHERE id = ?1;",
            params![
                activity.id.as_str(),
                activity.name.as_str(),
                activity.intensity,
                activity.description.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(ACTIVITY_ENTITY, activity.id.as_str()));
        }

        Ok(())
    }

    fn delete_activity(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM activity WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::not_found(ACTIVITY_ENTITY, id));
        }

        Ok(())
    }
}

fn parse_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get("id")?,
        name: row.get("name")?,
        intensity: row.get("intensity")?,
        description: row.get("description")?,
    })
}
