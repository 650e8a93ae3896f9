//! Core storage and data access for the calorie tracker.
//!
//! People, activities, meals and portions live in SQLite; records join a
//! person to an activity or meal at a timestamp. Referential integrity and
//! cascade deletes are enforced by the schema itself.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{Activity, NewActivity};
pub use model::handle::{validate_handle, HandleError};
pub use model::meal::{Meal, NewMeal};
pub use model::person::{NewPerson, Person};
pub use model::portion::{MealPortion, MealPortionKey, NewMealPortion, NewPortion, Portion};
pub use model::record::{
    ActivityRecord, ActivityRecordKey, MealRecord, MealRecordKey, NewActivityRecord,
    NewMealRecord, RecordTimestamp,
};
pub use repo::activity_repo::{ActivityRepository, SqliteActivityRepository};
pub use repo::meal_repo::{MealRepository, SqliteMealRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::portion_repo::{MealPortionQuery, PortionRepository, SqlitePortionRepository};
pub use repo::record_repo::{
    ActivityRecordQuery, MealRecordQuery, RecordRepository, SqliteRecordRepository,
};
pub use repo::session::{Session, UnitOfWork};
pub use repo::transaction::with_transaction;
pub use repo::{RepoError, RepoResult};
pub use service::activity_service::ActivityService;
pub use service::meal_service::MealService;
pub use service::person_service::PersonService;
pub use service::portion_service::PortionService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
