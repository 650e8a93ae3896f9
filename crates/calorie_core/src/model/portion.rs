//! Portion catalog entries and their per-meal breakdown.
//!
//! # Invariants
//! - A `MealPortion` is keyed by `(meal_id, portion_id)`; at most one row per
//!   pair exists.
//! - Deleting either side removes the `MealPortion` row.

use serde::{Deserialize, Serialize};

/// A nutritional portion. Macronutrient columns are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub density: Option<f64>,
    pub alcohol: Option<f64>,
    pub carbohydrate: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

/// Insert draft for [`Portion`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPortion {
    pub id: Option<String>,
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub density: Option<f64>,
    pub alcohol: Option<f64>,
    pub carbohydrate: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

impl NewPortion {
    /// Builds a draft with every required column set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, calories: f64) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            calories: Some(calories),
            ..Self::default()
        }
    }
}

impl From<&Portion> for NewPortion {
    fn from(value: &Portion) -> Self {
        Self {
            id: Some(value.id.clone()),
            name: Some(value.name.clone()),
            calories: Some(value.calories),
            density: value.density,
            alcohol: value.alcohol,
            carbohydrate: value.carbohydrate,
            protein: value.protein,
            fat: value.fat,
        }
    }
}

/// Composite key of a [`MealPortion`] row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealPortionKey {
    pub meal_id: String,
    pub portion_id: String,
}

impl MealPortionKey {
    pub fn new(meal_id: impl Into<String>, portion_id: impl Into<String>) -> Self {
        Self {
            meal_id: meal_id.into(),
            portion_id: portion_id.into(),
        }
    }
}

/// Weight of one portion inside one serving of a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPortion {
    pub meal_id: String,
    pub portion_id: String,
    pub weight_per_serving: f64,
}

impl MealPortion {
    pub fn key(&self) -> MealPortionKey {
        MealPortionKey::new(self.meal_id.clone(), self.portion_id.clone())
    }
}

/// Insert draft for [`MealPortion`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMealPortion {
    pub meal_id: Option<String>,
    pub portion_id: Option<String>,
    pub weight_per_serving: Option<f64>,
}

impl NewMealPortion {
    pub fn new(
        meal_id: impl Into<String>,
        portion_id: impl Into<String>,
        weight_per_serving: f64,
    ) -> Self {
        Self {
            meal_id: Some(meal_id.into()),
            portion_id: Some(portion_id.into()),
            weight_per_serving: Some(weight_per_serving),
        }
    }
}
