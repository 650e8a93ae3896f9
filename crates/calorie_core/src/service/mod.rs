//! Use-case services.
//!
//! # Responsibility
//! - Gate creation requests with the identifier schema.
//! - Delegate everything else to repositories, surfacing their errors
//!   unchanged.

use crate::model::handle::HandleError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity_service;
pub mod meal_service;
pub mod person_service;
pub mod portion_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Client-supplied identifier violates the handle schema.
    InvalidHandle(HandleError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// HTTP status a presentation layer should answer with.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::InvalidHandle(_) => 400,
            Self::Repo(err) => err.status_hint(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHandle(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHandle(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<HandleError> for ServiceError {
    fn from(value: HandleError) -> Self {
        Self::InvalidHandle(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Validates an optional draft id; a missing id counts as empty.
pub(crate) fn validate_draft_id(id: Option<&str>) -> Result<(), HandleError> {
    crate::model::handle::validate_handle(id.unwrap_or_default())
}
