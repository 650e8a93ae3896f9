//! Meal repository contract and SQLite implementation.
//!
//! # Invariants
//! - Meal ids are immutable; `update_meal` rewrites the other columns.
//! - Deleting a meal removes its meal records and meal portions.

use crate::model::meal::{Meal, NewMeal};
use crate::repo::session::Session;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

const MEAL_ENTITY: &str = "meal";

const MEAL_SELECT_SQL: &str = "SELECT
    id,
    name,
    servings,
    description
FROM meal";

/// Repository interface for meal operations.
pub trait MealRepository {
    fn create_meal(&self, meal: &NewMeal) -> RepoResult<Meal>;
    fn get_meal(&self, id: &str) -> RepoResult<Option<Meal>>;
    fn list_meals(&self) -> RepoResult<Vec<Meal>>;
    fn update_meal(&self, meal: &Meal) -> RepoResult<()>;
    fn delete_meal(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed meal repository.
pub struct SqliteMealRepository<'conn> {
    conn: Session<'conn>,
}

impl<'conn> SqliteMealRepository<'conn> {
    /// Creates repository from a migrated connection or an open unit of work.
    pub fn try_new(conn: impl Into<Session<'conn>>) -> RepoResult<Self> {
        let conn = conn.into();
        ensure_connection_ready(&conn, &["meal"])?;
        Ok(Self { conn })
    }
}

impl MealRepository for SqliteMealRepository<'_> {
    fn create_meal(&self, meal: &NewMeal) -> RepoResult<Meal> {
        self.conn.ensure_finite("meal", "servings", meal.servings)?;
        self.conn.execute(
            "INSERT INTO meal (
                id,
                name,
                servings,
                description
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                meal.id.as_deref(),
                meal.name.as_deref(),
                meal.servings,
                meal.description.as_deref(),
            ],
        )?;

        let id = meal.id.as_deref().unwrap_or_default();
        self.get_meal(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("meal `{id}` missing after insert")))
    }

    fn get_meal(&self, id: &str) -> RepoResult<Option<Meal>> {
        let meal = self
            .conn
            .query_row(
                &format!("{MEAL_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_meal_row,
            )
            .optional()?;
        Ok(meal)
    }

    fn list_meals(&self) -> RepoResult<Vec<Meal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEAL_SELECT_SQL} ORDER BY id ASC;"))?;
        let meals = stmt
            .query_map([], parse_meal_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meals)
    }

    fn update_meal(&self, meal: &Meal) -> RepoResult<()> {
        self.conn.ensure_finite("meal", "servings", meal.servings)?;
        let changed = self.conn.execute(
            "UPDATE meal
             SET
                name = ?2,
                servings = ?3,
                description = ?4
             WHERE id = ?1;",
            params![
                meal.id.as_str(),
                meal.name.as_str(),
                meal.servings,
                meal.description.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(MEAL_ENTITY, meal.id.as_str()));
        }

        Ok(())
    }

    fn delete_meal(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM meal WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::not_found(MEAL_ENTITY, id));
        }

        Ok(())
    }
}

fn parse_meal_row(row: &Row<'_>) -> rusqlite::Result<Meal> {
    Ok(Meal {
        id: row.get("id")?,
        name: row.get("name")?,
        servings: row.get("servings")?,
        description: row.get("description")?,
    })
}
