//! Resource handles: client-supplied identifiers and composite-key handles.
//!
//! # Responsibility
//! - Gate creation requests with the identifier schema.
//! - Render URL handles for composite-keyed rows.
//!
//! # Invariants
//! - Accepted identifiers are 1..=128 chars of `[a-z,0-9]` groups joined by
//!   single hyphens.
//! - Record handles embed the timestamp with microsecond precision and no
//!   spaces.

use crate::model::portion::MealPortionKey;
use crate::model::record::{ActivityRecordKey, MealRecordKey, RecordTimestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum identifier length, in characters.
pub const HANDLE_MAX_CHARS: usize = 128;

const HANDLE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.6f";

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z,0-9]+(-[a-z,0-9]+)*$").expect("valid handle regex"));

/// Identifier schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    Empty,
    TooLong { len: usize },
    InvalidFormat(String),
}

impl Display for HandleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier cannot be empty"),
            Self::TooLong { len } => write!(
                f,
                "identifier has {len} characters; at most {HANDLE_MAX_CHARS} allowed"
            ),
            Self::InvalidFormat(value) => write!(
                f,
                "identifier `{value}` must be lowercase alphanumeric groups joined by `-`"
            ),
        }
    }
}

impl Error for HandleError {}

/// Validates a client-supplied identifier against the handle schema.
pub fn validate_handle(value: &str) -> Result<(), HandleError> {
    if value.is_empty() {
        return Err(HandleError::Empty);
    }
    let len = value.chars().count();
    if len > HANDLE_MAX_CHARS {
        return Err(HandleError::TooLong { len });
    }
    if !HANDLE_RE.is_match(value) {
        return Err(HandleError::InvalidFormat(value.to_string()));
    }
    Ok(())
}

fn timestamp_handle(value: &RecordTimestamp) -> String {
    value.format(HANDLE_TIMESTAMP_FORMAT).to_string()
}

impl ActivityRecordKey {
    /// URL handle, e.g. `p1-run-2024-03-09_07:05:03.000042`.
    pub fn handle(&self) -> String {
        format!(
            "{}-{}-{}",
            self.person_id,
            self.activity_id,
            timestamp_handle(&self.timestamp)
        )
    }
}

impl MealRecordKey {
    /// URL handle, e.g. `p1-soup-2024-03-09_07:05:03.000042`.
    pub fn handle(&self) -> String {
        format!(
            "{}-{}-{}",
            self.person_id,
            self.meal_id,
            timestamp_handle(&self.timestamp)
        )
    }
}

impl MealPortionKey {
    /// URL handle, e.g. `soup-carrot`.
    pub fn handle(&self) -> String {
        format!("{}-{}", self.meal_id, self.portion_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_handle, HandleError, HANDLE_MAX_CHARS};
    use crate::model::portion::MealPortionKey;
    use crate::model::record::{ActivityRecordKey, MealRecordKey};
    use chrono::NaiveDate;

    #[test]
    fn accepts_lowercase_hyphenated_identifiers() {
        for value in ["p1", "677", "run-fast", "a-1-b"] {
            assert_eq!(validate_handle(value), Ok(()), "{value}");
        }
    }

    #[test]
    fn rejects_uppercase_spaces_and_double_hyphens() {
        for value in ["Run", "run fast", "a--b", "-a", "a-", "a_b"] {
            assert!(
                matches!(validate_handle(value), Err(HandleError::InvalidFormat(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn rejects_empty_and_overlong() {
        assert_eq!(validate_handle(""), Err(HandleError::Empty));
        let long = "a".repeat(HANDLE_MAX_CHARS + 1);
        assert_eq!(
            validate_handle(&long),
            Err(HandleError::TooLong {
                len: HANDLE_MAX_CHARS + 1
            })
        );
        assert_eq!(validate_handle(&"a".repeat(HANDLE_MAX_CHARS)), Ok(()));
    }

    #[test]
    fn record_handles_embed_underscored_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 3, 42)
            .unwrap();
        assert_eq!(
            MealRecordKey::new("p1", "soup", ts).handle(),
            "p1-soup-2024-03-09_07:05:03.000042"
        );
        assert_eq!(
            ActivityRecordKey::new("p1", "run", ts).handle(),
            "p1-run-2024-03-09_07:05:03.000042"
        );
        assert_eq!(MealPortionKey::new("soup", "carrot").handle(), "soup-carrot");
    }
}
