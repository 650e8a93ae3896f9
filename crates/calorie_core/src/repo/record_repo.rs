//! Activity/meal record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `activity_record` and `meal_record` join tables.
//! - Equality-filtered listing over any subset of key columns.
//!
//! # Invariants
//! - Records are addressed by their full composite key; deleting one never
//!   touches siblings sharing only the person or only the activity/meal.
//! - Listings are ordered by `timestamp ASC`, then key columns.

use crate::model::record::{
    normalize_timestamp, parse_db_timestamp, timestamp_to_db, ActivityRecord, ActivityRecordKey,
    MealRecord, MealRecordKey, NewActivityRecord, NewMealRecord, RecordTimestamp,
};
use crate::repo::session::Session;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

const ACTIVITY_RECORD_ENTITY: &str = "activity record";
const MEAL_RECORD_ENTITY: &str = "meal record";

const ACTIVITY_RECORD_SELECT_SQL: &str = "SELECT
    person_id,
    activity_id,
    timestamp,
    duration
FROM activity_record";

const MEAL_RECORD_SELECT_SQL: &str = "SELECT
    person_id,
    meal_id,
    timestamp,
    qty
FROM meal_record";

/// Equality filters for listing activity records. Unset fields match any row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRecordQuery {
    pub person_id: Option<String>,
    pub activity_id: Option<String>,
    pub timestamp: Option<RecordTimestamp>,
}

/// Equality filters for listing meal records. Unset fields match any row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealRecordQuery {
    pub person_id: Option<String>,
    pub meal_id: Option<String>,
    pub timestamp: Option<RecordTimestamp>,
}

/// Repository interface for activity and meal records.
pub trait RecordRepository {
    fn create_activity_record(&self, record: &NewActivityRecord) -> RepoResult<ActivityRecord>;
    fn get_activity_record(&self, key: &ActivityRecordKey) -> RepoResult<Option<ActivityRecord>>;
    fn list_activity_records(&self, query: &ActivityRecordQuery)
        -> RepoResult<Vec<ActivityRecord>>;
    /// Rewrites `duration` of the record addressed by `record.key()`.
    fn update_activity_record(&self, record: &ActivityRecord) -> RepoResult<()>;
    fn delete_activity_record(&self, key: &ActivityRecordKey) -> RepoResult<()>;

    fn create_meal_record(&self, record: &NewMealRecord) -> RepoResult<MealRecord>;
    fn get_meal_record(&self, key: &MealRecordKey) -> RepoResult<Option<MealRecord>>;
    fn list_meal_records(&self, query: &MealRecordQuery) -> RepoResult<Vec<MealRecord>>;
    /// Rewrites `qty` of the record addressed by `record.key()`.
    fn update_meal_record(&self, record: &MealRecord) -> RepoResult<()>;
    fn delete_meal_record(&self, key: &MealRecordKey) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: Session<'conn>,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Creates repository from a migrated connection or an open unit of work.
    pub fn try_new(conn: impl Into<Session<'conn>>) -> RepoResult<Self> {
        let conn = conn.into();
        ensure_connection_ready(&conn, &["activity_record", "meal_record"])?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_activity_record(&self, record: &NewActivityRecord) -> RepoResult<ActivityRecord> {
        let timestamp = record.timestamp.map(normalize_timestamp);
        self.conn.execute(
            "INSERT INTO activity_record (
                person_id,
                activity_id,
                timestamp,
                duration
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                record.person_id.as_deref(),
                record.activity_id.as_deref(),
                timestamp.as_ref().map(timestamp_to_db),
                record.duration,
            ],
        )?;

        // Every key column is NOT NULL, so the insert above succeeded only
        // with all of them set.
        let (Some(person_id), Some(activity_id), Some(timestamp)) =
            (record.person_id.as_deref(), record.activity_id.as_deref(), timestamp)
        else {
            return Err(RepoError::InvalidData(
                "activity record inserted without full key".to_string(),
            ));
        };
        let key = ActivityRecordKey::new(person_id, activity_id, timestamp);
        self.get_activity_record(&key)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "activity record `{}` missing after insert",
                key.handle()
            ))
        })
    }

    fn get_activity_record(&self, key: &ActivityRecordKey) -> RepoResult<Option<ActivityRecord>> {
        let query = ActivityRecordQuery {
            person_id: Some(key.person_id.clone()),
            activity_id: Some(key.activity_id.clone()),
            timestamp: Some(key.timestamp),
        };
        Ok(self.list_activity_records(&query)?.into_iter().next())
    }

    fn list_activity_records(
        &self,
        query: &ActivityRecordQuery,
    ) -> RepoResult<Vec<ActivityRecord>> {
        let mut sql = format!("{ACTIVITY_RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(person_id) = query.person_id.as_ref() {
            sql.push_str(" AND person_id = ?");
            bind_values.push(Value::Text(person_id.clone()));
        }

        if let Some(activity_id) = query.activity_id.as_ref() {
            sql.push_str(" AND activity_id = ?");
            bind_values.push(Value::Text(activity_id.clone()));
        }

        push_timestamp_filter(&mut sql, &mut bind_values, query.timestamp);
        sql.push_str(" ORDER BY timestamp ASC, person_id ASC, activity_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_activity_record_row(row)?);
        }

        Ok(records)
    }

    fn update_activity_record(&self, record: &ActivityRecord) -> RepoResult<()> {
        let key = record.key();
        let changed = self.conn.execute(
            "UPDATE activity_record
             SET duration = ?4
             WHERE person_id = ?1
               AND activity_id = ?2
               AND timestamp = ?3;",
            params![
                key.person_id.as_str(),
                key.activity_id.as_str(),
                timestamp_to_db(&key.timestamp),
                record.duration,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(ACTIVITY_RECORD_ENTITY, key.handle()));
        }

        Ok(())
    }

    fn delete_activity_record(&self, key: &ActivityRecordKey) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM activity_record
             WHERE person_id = ?1
               AND activity_id = ?2
               AND timestamp = ?3;",
            params![
                key.person_id.as_str(),
                key.activity_id.as_str(),
                timestamp_to_db(&normalize_timestamp(key.timestamp)),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(ACTIVITY_RECORD_ENTITY, key.handle()));
        }

        Ok(())
    }

    fn create_meal_record(&self, record: &NewMealRecord) -> RepoResult<MealRecord> {
        self.conn.ensure_finite("meal_record", "qty", record.qty)?;
        let timestamp = record.timestamp.map(normalize_timestamp);
        self.conn.execute(
            "INSERT INTO meal_record (
                person_id,
                meal_id,
                timestamp,
                qty
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                record.person_id.as_deref(),
                record.meal_id.as_deref(),
                timestamp.as_ref().map(timestamp_to_db),
                record.qty,
            ],
        )?;

        let (Some(person_id), Some(meal_id), Some(timestamp)) =
            (record.person_id.as_deref(), record.meal_id.as_deref(), timestamp)
        else {
            return Err(RepoError::InvalidData(
                "meal record inserted without full key".to_string(),
            ));
        };
        let key = MealRecordKey::new(person_id, meal_id, timestamp);
        self.get_meal_record(&key)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "meal record `{}` missing after insert",
                key.handle()
            ))
        })
    }

    fn get_meal_record(&self, key: &MealRecordKey) -> RepoResult<Option<MealRecord>> {
        let query = MealRecordQuery {
            person_id: Some(key.person_id.clone()),
            meal_id: Some(key.meal_id.clone()),
            timestamp: Some(key.timestamp),
        };
        Ok(self.list_meal_records(&query)?.into_iter().next())
    }

    fn list_meal_records(&self, query: &MealRecordQuery) -> RepoResult<Vec<MealRecord>> {
        let mut sql = format!("{MEAL_RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(person_id) = query.person_id.as_ref() {
            sql.push_str(" AND person_id = ?");
            bind_values.push(Value::Text(person_id.clone()));
        }

        if let Some(meal_id) = query.meal_id.as_ref() {
            sql.push_str(" AND meal_id = ?");
            bind_values.push(Value::Text(meal_id.clone()));
        }

        push_timestamp_filter(&mut sql, &mut bind_values, query.timestamp);
        sql.push_str(" ORDER BY timestamp ASC, person_id ASC, meal_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_meal_record_row(row)?);
        }

        Ok(records)
    }

    fn update_meal_record(&self, record: &MealRecord) -> RepoResult<()> {
        self.conn.ensure_finite("meal_record", "qty", record.qty)?;
        let key = record.key();
        let changed = self.conn.execute(
            "UPDATE meal_record
             SET qty = ?4
             WHERE person_id = ?1
               AND meal_id = ?2
               AND timestamp = ?3;",
            params![
                key.person_id.as_str(),
                key.meal_id.as_str(),
                timestamp_to_db(&key.timestamp),
                record.qty,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(MEAL_RECORD_ENTITY, key.handle()));
        }

        Ok(())
    }

    fn delete_meal_record(&self, key: &MealRecordKey) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM meal_record
             WHERE person_id = ?1
               AND meal_id = ?2
               AND timestamp = ?3;",
            params![
                key.person_id.as_str(),
                key.meal_id.as_str(),
                timestamp_to_db(&normalize_timestamp(key.timestamp)),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(MEAL_RECORD_ENTITY, key.handle()));
        }

        Ok(())
    }
}

fn push_timestamp_filter(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    timestamp: Option<RecordTimestamp>,
) {
    if let Some(timestamp) = timestamp {
        sql.push_str(" AND timestamp = ?");
        bind_values.push(Value::Text(timestamp_to_db(&normalize_timestamp(
            timestamp,
        ))));
    }
}

fn parse_timestamp_column(row: &Row<'_>, table: &str) -> RepoResult<RecordTimestamp> {
    let text: String = row.get("timestamp")?;
    parse_db_timestamp(&text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{text}` in {table}.timestamp"))
    })
}

fn parse_activity_record_row(row: &Row<'_>) -> RepoResult<ActivityRecord> {
    Ok(ActivityRecord {
        person_id: row.get("person_id")?,
        activity_id: row.get("activity_id")?,
        timestamp: parse_timestamp_column(row, "activity_record")?,
        duration: row.get("duration")?,
    })
}

fn parse_meal_record_row(row: &Row<'_>) -> RepoResult<MealRecord> {
    Ok(MealRecord {
        person_id: row.get("person_id")?,
        meal_id: row.get("meal_id")?,
        timestamp: parse_timestamp_column(row, "meal_record")?,
        qty: row.get("qty")?,
    })
}
