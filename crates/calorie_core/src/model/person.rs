//! Person entity.

use serde::{Deserialize, Serialize};

/// A tracked person. Owns activity and meal records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Insert draft for [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    pub id: Option<String>,
}

impl NewPerson {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

impl From<&Person> for NewPerson {
    fn from(value: &Person) -> Self {
        Self::new(value.id.clone())
    }
}
