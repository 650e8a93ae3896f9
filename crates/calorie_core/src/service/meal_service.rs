//! Meal use-case service.

use crate::model::meal::{Meal, NewMeal};
use crate::repo::meal_repo::MealRepository;
use crate::repo::RepoResult;
use crate::service::{validate_draft_id, ServiceResult};
use log::{info, warn};

/// Use-case service wrapper for meal operations.
pub struct MealService<R: MealRepository> {
    repo: R,
}

impl<R: MealRepository> MealService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a meal after checking its id against the handle schema.
    pub fn create_meal(&self, meal: &NewMeal) -> ServiceResult<Meal> {
        validate_draft_id(meal.id.as_deref())?;
        self.repo.create_meal(meal).map_err(|err| {
            warn!("event=meal_create module=service status=error error={err}");
            err.into()
        })
    }

    pub fn get_meal(&self, id: &str) -> RepoResult<Option<Meal>> {
        self.repo.get_meal(id)
    }

    pub fn list_meals(&self) -> RepoResult<Vec<Meal>> {
        self.repo.list_meals()
    }

    pub fn update_meal(&self, meal: &Meal) -> RepoResult<()> {
        self.repo.update_meal(meal)
    }

    /// Deletes a meal with its records and portion breakdown.
    pub fn delete_meal(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_meal(id)?;
        info!("event=meal_delete module=service status=ok");
        Ok(())
    }
}
