//! Join-table records: an activity performed or a meal eaten at a timestamp.
//!
//! # Responsibility
//! - Define composite keys `(person, activity|meal, timestamp)`.
//! - Own the storage text format for record timestamps.
//!
//! # Invariants
//! - Timestamps are truncated to microseconds before they are keyed, so a
//!   value read back from storage compares equal to the one written.
//! - Storage format is `YYYY-MM-DD HH:MM:SS.ffffff`; lexical order equals
//!   chronological order.

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Point in time a record was captured at.
pub type RecordTimestamp = NaiveDateTime;

const TIMESTAMP_DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Normalizes a timestamp to the precision kept by storage.
pub fn normalize_timestamp(value: RecordTimestamp) -> RecordTimestamp {
    value.trunc_subsecs(6)
}

/// Formats a timestamp for storage and key comparison.
pub fn timestamp_to_db(value: &RecordTimestamp) -> String {
    value.format(TIMESTAMP_DB_FORMAT).to_string()
}

/// Parses a stored timestamp. Returns `None` on malformed text.
pub fn parse_db_timestamp(value: &str) -> Option<RecordTimestamp> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_DB_FORMAT).ok()
}

/// Composite primary key of an [`ActivityRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityRecordKey {
    pub person_id: String,
    pub activity_id: String,
    pub timestamp: RecordTimestamp,
}

impl ActivityRecordKey {
    pub fn new(
        person_id: impl Into<String>,
        activity_id: impl Into<String>,
        timestamp: RecordTimestamp,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            activity_id: activity_id.into(),
            timestamp: normalize_timestamp(timestamp),
        }
    }
}

/// An activity performed by a person for `duration` seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub person_id: String,
    pub activity_id: String,
    pub timestamp: RecordTimestamp,
    /// Seconds.
    pub duration: i64,
}

impl ActivityRecord {
    pub fn key(&self) -> ActivityRecordKey {
        ActivityRecordKey::new(
            self.person_id.clone(),
            self.activity_id.clone(),
            self.timestamp,
        )
    }
}

/// Insert draft for [`ActivityRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewActivityRecord {
    pub person_id: Option<String>,
    pub activity_id: Option<String>,
    pub timestamp: Option<RecordTimestamp>,
    pub duration: Option<i64>,
}

impl NewActivityRecord {
    pub fn new(
        person_id: impl Into<String>,
        activity_id: impl Into<String>,
        timestamp: RecordTimestamp,
        duration: i64,
    ) -> Self {
        Self {
            person_id: Some(person_id.into()),
            activity_id: Some(activity_id.into()),
            timestamp: Some(normalize_timestamp(timestamp)),
            duration: Some(duration),
        }
    }
}

/// Composite primary key of a [`MealRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealRecordKey {
    pub person_id: String,
    pub meal_id: String,
    pub timestamp: RecordTimestamp,
}

impl MealRecordKey {
    pub fn new(
        person_id: impl Into<String>,
        meal_id: impl Into<String>,
        timestamp: RecordTimestamp,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            meal_id: meal_id.into(),
            timestamp: normalize_timestamp(timestamp),
        }
    }
}

/// A meal eaten by a person; `qty` counts servings and may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub person_id: String,
    pub meal_id: String,
    pub timestamp: RecordTimestamp,
    pub qty: f64,
}

impl MealRecord {
    pub fn key(&self) -> MealRecordKey {
        MealRecordKey::new(self.person_id.clone(), self.meal_id.clone(), self.timestamp)
    }
}

/// Insert draft for [`MealRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMealRecord {
    pub person_id: Option<String>,
    pub meal_id: Option<String>,
    pub timestamp: Option<RecordTimestamp>,
    pub qty: Option<f64>,
}

impl NewMealRecord {
    pub fn new(
        person_id: impl Into<String>,
        meal_id: impl Into<String>,
        timestamp: RecordTimestamp,
        qty: f64,
    ) -> Self {
        Self {
            person_id: Some(person_id.into()),
            meal_id: Some(meal_id.into()),
            timestamp: Some(normalize_timestamp(timestamp)),
            qty: Some(qty),
        }
    }
}
