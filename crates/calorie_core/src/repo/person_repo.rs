//! Person repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a person removes its activity and meal records in the same
//!   statement (`ON DELETE CASCADE`).
//! - Renaming a person moves its records to the new id
//!   (`ON UPDATE CASCADE`).

use crate::model::person::{NewPerson, Person};
use crate::repo::session::Session;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

const PERSON_ENTITY: &str = "person";

/// Repository interface for person operations.
pub trait PersonRepository {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person>;
    fn get_person(&self, id: &str) -> RepoResult<Option<Person>>;
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    /// Changes the primary key; dependent records follow.
    fn rename_person(&self, id: &str, new_id: &str) -> RepoResult<Person>;
    fn delete_person(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: Session<'conn>,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates repository from a migrated connection or an open unit of work.
    pub fn try_new(conn: impl Into<Session<'conn>>) -> RepoResult<Self> {
        let conn = conn.into();
        ensure_connection_ready(&conn, &["person"])?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person> {
        self.conn.execute(
            "INSERT INTO person (id) VALUES (?1);",
            params![person.id.as_deref()],
        )?;

        let id = person.id.as_deref().unwrap_or_default();
        self.get_person(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("person `{id}` missing after insert")))
    }

    fn get_person(&self, id: &str) -> RepoResult<Option<Person>> {
        let person = self
            .conn
            .query_row("SELECT id FROM person WHERE id = ?1;", [id], parse_person_row)
            .optional()?;
        Ok(person)
    }

    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare("SELECT id FROM person ORDER BY id ASC;")?;
        let persons = stmt
            .query_map([], parse_person_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    fn rename_person(&self, id: &str, new_id: &str) -> RepoResult<Person> {
        let changed = self.conn.execute(
            "UPDATE person SET id = ?2 WHERE id = ?1;",
            params![id, new_id],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(PERSON_ENTITY, id));
        }

        Ok(Person::new(new_id))
    }

    fn delete_person(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM person WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::not_found(PERSON_ENTITY, id));
        }

        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person { id: row.get("id")? })
}
