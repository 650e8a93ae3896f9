//! Portion use-case service.

use crate::model::portion::{MealPortion, MealPortionKey, NewMealPortion, NewPortion, Portion};
use crate::repo::portion_repo::{MealPortionQuery, PortionRepository};
use crate::repo::RepoResult;
use crate::service::{validate_draft_id, ServiceResult};
use log::warn;

/// Use-case service wrapper for portions and meal breakdowns.
pub struct PortionService<R: PortionRepository> {
    repo: R,
}

impl<R: PortionRepository> PortionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a portion after checking its id against the handle schema.
    pub fn create_portion(&self, portion: &NewPortion) -> ServiceResult<Portion> {
        validate_draft_id(portion.id.as_deref())?;
        self.repo.create_portion(portion).map_err(|err| {
            warn!("event=portion_create module=service status=error error={err}");
            err.into()
        })
    }

    pub fn get_portion(&self, id: &str) -> RepoResult<Option<Portion>> {
        self.repo.get_portion(id)
    }

    pub fn list_portions(&self) -> RepoResult<Vec<Portion>> {
        self.repo.list_portions()
    }

    pub fn update_portion(&self, portion: &Portion) -> RepoResult<()> {
        self.repo.update_portion(portion)
    }

    pub fn delete_portion(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_portion(id)
    }

    /// Links a portion into a meal. Both sides must already exist.
    pub fn add_meal_portion(&self, meal_portion: &NewMealPortion) -> RepoResult<MealPortion> {
        self.repo.create_meal_portion(meal_portion)
    }

    /// Lists the portion breakdown of one meal.
    pub fn meal_breakdown(&self, meal_id: &str) -> RepoResult<Vec<MealPortion>> {
        self.repo.list_meal_portions(&MealPortionQuery {
            meal_id: Some(meal_id.to_string()),
            ..MealPortionQuery::default()
        })
    }

    pub fn remove_meal_portion(&self, key: &MealPortionKey) -> RepoResult<()> {
        self.repo.delete_meal_portion(key)
    }
}
