//! Activity entity.
//!
//! # Invariants
//! - `intensity` is expressed in kcal per hour.
//! - `description` is bounded to 8192 characters by a storage CHECK.

use serde::{Deserialize, Serialize};

/// Maximum stored description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 8 * 1024;

/// A physical activity a person can perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    /// kcal per hour.
    pub intensity: i64,
    pub description: Option<String>,
}

/// Insert draft for [`Activity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewActivity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub intensity: Option<i64>,
    pub description: Option<String>,
}

impl NewActivity {
    /// Builds a draft with every required column set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, intensity: i64) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            intensity: Some(intensity),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&Activity> for NewActivity {
    fn from(value: &Activity) -> Self {
        Self {
            id: Some(value.id.clone()),
            name: Some(value.name.clone()),
            intensity: Some(value.intensity),
            description: value.description.clone(),
        }
    }
}
