//! Portion catalog and meal-portion repository.
//!
//! # Invariants
//! - A meal portion cannot reference a missing meal or portion.
//! - Deleting a portion removes only the meal portions that reference it.

use crate::model::portion::{MealPortion, MealPortionKey, NewMealPortion, NewPortion, Portion};
use crate::repo::session::Session;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const PORTION_ENTITY: &str = "portion";
const MEAL_PORTION_ENTITY: &str = "meal portion";

const NUTRIENT_COLUMNS: [&str; 5] = ["density", "alcohol", "carbohydrate", "protein", "fat"];

const PORTION_SELECT_SQL: &str = "SELECT
    id,
    name,
    calories,
    density,
    alcohol,
    carbohydrate,
    protein,
    fat
FROM portion";

const MEAL_PORTION_SELECT_SQL: &str = "SELECT
    meal_id,
    portion_id,
    weight_per_serving
FROM meal_portion";

/// Equality filters for listing meal portions. Unset fields match any row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPortionQuery {
    pub meal_id: Option<String>,
    pub portion_id: Option<String>,
}

/// Repository interface for portions and their meal breakdown.
pub trait PortionRepository {
    fn create_portion(&self, portion: &NewPortion) -> RepoResult<Portion>;
    fn get_portion(&self, id: &str) -> RepoResult<Option<Portion>>;
    fn list_portions(&self) -> RepoResult<Vec<Portion>>;
    fn update_portion(&self, portion: &Portion) -> RepoResult<()>;
    fn delete_portion(&self, id: &str) -> RepoResult<()>;
    fn create_meal_portion(&self, meal_portion: &NewMealPortion) -> RepoResult<MealPortion>;
    fn get_meal_portion(&self, key: &MealPortionKey) -> RepoResult<Option<MealPortion>>;
    fn list_meal_portions(&self, query: &MealPortionQuery) -> RepoResult<Vec<MealPortion>>;
    fn delete_meal_portion(&self, key: &MealPortionKey) -> RepoResult<()>;
}

/// SQLite-backed portion repository.
pub struct SqlitePortionRepository<'conn> {
    conn: Session<'conn>,
}

impl<'conn> SqlitePortionRepository<'conn> {
    /// Creates repository from a migrated connection or an open unit of work.
    pub fn try_new(conn: impl Into<Session<'conn>>) -> RepoResult<Self> {
        let conn = conn.into();
        ensure_connection_ready(&conn, &["portion", "meal_portion"])?;
        Ok(Self { conn })
    }

    fn ensure_finite_nutrients(
        &self,
        calories: impl Into<Option<f64>>,
        optional: [Option<f64>; 5],
    ) -> RepoResult<()> {
        self.conn.ensure_finite("portion", "calories", calories)?;
        for (column, value) in NUTRIENT_COLUMNS.iter().zip(optional) {
            self.conn.ensure_finite("portion", column, value)?;
        }
        Ok(())
    }
}

impl PortionRepository for SqlitePortionRepository<'_> {
    fn create_portion(&self, portion: &NewPortion) -> RepoResult<Portion> {
        self.ensure_finite_nutrients(
            portion.calories,
            [portion.density, portion.alcohol, portion.carbohydrate, portion.protein, portion.fat],
        )?;
        self.conn.execute(
            "INSERT INTO portion (
                id,
                name,
                calories,
                density,
                alcohol,
                carbohydrate,
                protein,
                fat
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                portion.id.as_deref(),
                portion.name.as_deref(),
                portion.calories,
                portion.density,
                portion.alcohol,
                portion.carbohydrate,
                portion.protein,
                portion.fat,
            ],
        )?;

        let id = portion.id.as_deref().unwrap_or_default();
        self.get_portion(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("portion `{id}` missing after insert")))
    }

    fn get_portion(&self, id: &str) -> RepoResult<Option<Portion>> {
        let portion = self
            .conn
            .query_row(
                &format!("{PORTION_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_portion_row,
            )
            .optional()?;
        Ok(portion)
    }

    fn list_portions(&self) -> RepoResult<Vec<Portion>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PORTION_SELECT_SQL} ORDER BY id ASC;"))?;
        let portions = stmt
            .query_map([], parse_portion_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(portions)
    }

    fn update_portion(&self, portion: &Portion) -> RepoResult<()> {
        self.ensure_finite_nutrients(
            portion.calories,
            [portion.density, portion.alcohol, portion.carbohydrate, portion.protein, portion.fat],
        )?;
        let changed = self.conn.execute(
            "UPDATE portion
             SET
                name = ?2,
                calories = ?3,
                density = ?4,
                alcohol = ?5,
                carbohydrate = ?6,
                protein = ?7,
                fat = ?8
             WHERE id = ?1;",
            params![
                portion.id.as_str(),
                portion.name.as_str(),
                portion.calories,
                portion.density,
                portion.alcohol,
                portion.carbohydrate,
                portion.protein,
                portion.fat,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(PORTION_ENTITY, portion.id.as_str()));
        }

        Ok(())
    }

    fn delete_portion(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM portion WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::not_found(PORTION_ENTITY, id));
        }

        Ok(())
    }

    fn create_meal_portion(&self, meal_portion: &NewMealPortion) -> RepoResult<MealPortion> {
        self.conn.ensure_finite(
            "meal_portion",
            "weight_per_serving",
            meal_portion.weight_per_serving,
        )?;
        self.conn.execute(
            "INSERT INTO meal_portion (
                meal_id,
                portion_id,
                weight_per_serving
            ) VALUES (?1, ?2, ?3);",
            params![
                meal_portion.meal_id.as_deref(),
                meal_portion.portion_id.as_deref(),
                meal_portion.weight_per_serving,
            ],
        )?;

        let key = MealPortionKey::new(
            meal_portion.meal_id.as_deref().unwrap_or_default(),
            meal_portion.portion_id.as_deref().unwrap_or_default(),
        );
        self.get_meal_portion(&key)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "meal portion `{}` missing after insert",
                key.handle()
            ))
        })
    }

    fn get_meal_portion(&self, key: &MealPortionKey) -> RepoResult<Option<MealPortion>> {
        let meal_portion = self
            .conn
            .query_row(
                &format!("{MEAL_PORTION_SELECT_SQL} WHERE meal_id = ?1 AND portion_id = ?2;"),
                params![key.meal_id.as_str(), key.portion_id.as_str()],
                parse_meal_portion_row,
            )
            .optional()?;
        Ok(meal_portion)
    }

    fn list_meal_portions(&self, query: &MealPortionQuery) -> RepoResult<Vec<MealPortion>> {
        let mut sql = format!("{MEAL_PORTION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(meal_id) = query.meal_id.as_ref() {
            sql.push_str(" AND meal_id = ?");
            bind_values.push(Value::Text(meal_id.clone()));
        }

        if let Some(portion_id) = query.portion_id.as_ref() {
            sql.push_str(" AND portion_id = ?");
            bind_values.push(Value::Text(portion_id.clone()));
        }

        sql.push_str(" ORDER BY meal_id ASC, portion_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let meal_portions = stmt
            .query_map(params_from_iter(bind_values), parse_meal_portion_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(meal_portions)
    }

    fn delete_meal_portion(&self, key: &MealPortionKey) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM meal_portion WHERE meal_id = ?1 AND portion_id = ?2;",
            params![key.meal_id.as_str(), key.portion_id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(MEAL_PORTION_ENTITY, key.handle()));
        }

        Ok(())
    }
}

fn parse_portion_row(row: &Row<'_>) -> rusqlite::Result<Portion> {
    Ok(Portion {
        id: row.get("id")?,
        name: row.get("name")?,
        calories: row.get("calories")?,
        density: row.get("density")?,
        alcohol: row.get("alcohol")?,
        carbohydrate: row.get("carbohydrate")?,
        protein: row.get("protein")?,
        fat: row.get("fat")?,
    })
}

fn parse_meal_portion_row(row: &Row<'_>) -> rusqlite::Result<MealPortion> {
    Ok(MealPortion {
        meal_id: row.get("meal_id")?,
        portion_id: row.get("portion_id")?,
        weight_per_serving: row.get("weight_per_serving")?,
    })
}
