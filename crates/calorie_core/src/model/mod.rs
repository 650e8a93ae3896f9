//! Domain model for the calorie tracker.
//!
//! # Responsibility
//! - Define entity read models returned by repositories.
//! - Define insert drafts (`New*`) whose unset required fields are left for
//!   the storage NOT NULL constraints to reject.
//! - Define composite keys for join-table rows.
//!
//! # Invariants
//! - Read models always carry every required column.
//! - Record timestamps are kept at microsecond precision.

pub mod activity;
pub mod handle;
pub mod meal;
pub mod person;
pub mod portion;
pub mod record;
