//! Meal entity.

use serde::{Deserialize, Serialize};

/// A meal a person can eat. `servings` may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub servings: f64,
    pub description: Option<String>,
}

/// Insert draft for [`Meal`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMeal {
    pub id: Option<String>,
    pub name: Option<String>,
    pub servings: Option<f64>,
    pub description: Option<String>,
}

impl NewMeal {
    /// Builds a draft with every required column set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, servings: f64) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            servings: Some(servings),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&Meal> for NewMeal {
    fn from(value: &Meal) -> Self {
        Self {
            id: Some(value.id.clone()),
            name: Some(value.name.clone()),
            servings: Some(value.servings),
            description: value.description.clone(),
        }
    }
}
