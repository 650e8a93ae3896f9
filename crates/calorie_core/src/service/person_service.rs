//! Person use-case service.

use crate::model::handle::validate_handle;
use crate::model::person::{NewPerson, Person};
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoResult;
use crate::service::ServiceResult;
use log::{info, warn};

/// Use-case service wrapper for person operations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a person after checking `id` against the handle schema.
    ///
    /// Duplicate ids surface as `RepoError::Duplicate`.
    pub fn create_person(&self, id: &str) -> ServiceResult<Person> {
        validate_handle(id)?;
        match self.repo.create_person(&NewPerson::new(id)) {
            Ok(person) => {
                info!("event=person_create module=service status=ok");
                Ok(person)
            }
            Err(err) => {
                warn!("event=person_create module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn get_person(&self, id: &str) -> RepoResult<Option<Person>> {
        self.repo.get_person(id)
    }

    pub fn list_persons(&self) -> RepoResult<Vec<Person>> {
        self.repo.list_persons()
    }

    /// Renames a person; the new id must satisfy the handle schema.
    pub fn rename_person(&self, id: &str, new_id: &str) -> ServiceResult<Person> {
        validate_handle(new_id)?;
        let person = self.repo.rename_person(id, new_id)?;
        info!("event=person_rename module=service status=ok");
        Ok(person)
    }

    /// Deletes a person and, through the schema, all of its records.
    pub fn delete_person(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_person(id)?;
        info!("event=person_delete module=service status=ok");
        Ok(())
    }
}
