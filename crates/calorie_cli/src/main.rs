//! CLI smoke entry point.
//!
//! Opens the configured database (migrating it when needed) and prints one
//! line per entity table with its row count.

use calorie_core::db::open_db;
use calorie_core::{
    init_logging, ActivityRecordQuery, ActivityRepository, MealRecordQuery, MealRepository,
    PersonRepository, PortionRepository, RecordRepository, RepoResult, SqliteActivityRepository,
    SqliteMealRepository, SqlitePersonRepository, SqlitePortionRepository,
    SqliteRecordRepository, TrackerConfig,
};
use log::error;
use rusqlite::Connection;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = TrackerConfig::from_env();
    println!("calorie_core ping={}", calorie_core::ping());
    println!("calorie_core version={}", calorie_core::core_version());

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!("cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    match print_summary(&conn) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("summary failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(conn: &Connection) -> RepoResult<()> {
    let persons = SqlitePersonRepository::try_new(conn)?.list_persons()?;
    let activities = SqliteActivityRepository::try_new(conn)?.list_activities()?;
    let meals = SqliteMealRepository::try_new(conn)?.list_meals()?;
    let portions = SqlitePortionRepository::try_new(conn)?.list_portions()?;
    let records = SqliteRecordRepository::try_new(conn)?;
    let activity_records = records.list_activity_records(&ActivityRecordQuery::default())?;
    let meal_records = records.list_meal_records(&MealRecordQuery::default())?;

    println!("persons={}", persons.len());
    println!("activities={}", activities.len());
    println!("meals={}", meals.len());
    println!("portions={}", portions.len());
    println!("activity_records={}", activity_records.len());
    println!("meal_records={}", meal_records.len());
    Ok(())
}
