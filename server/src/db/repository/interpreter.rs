//! Interpreter Profile Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Interpreter, InterpreterUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "interpreter";

#[derive(Clone)]
pub struct InterpreterRepository {
    base: BaseRepository,
}

impl InterpreterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Interpreter>> {
        let interpreters: Vec<Interpreter> = self
            .base
            .db()
            .query("SELECT * FROM interpreter ORDER BY name")
            .await?
            .take(0)?;
        Ok(interpreters)
    }

    /// Active interpreters offering a language pair, for offer targeting
    pub async fn find_active_by_language(&self, language: &str) -> RepoResult<Vec<Interpreter>> {
        let language = language.to_string();
        let interpreters: Vec<Interpreter> = self
            .base
            .db()
            .query(
                "SELECT * FROM interpreter \
                 WHERE is_active = true AND $language IN languages ORDER BY name",
            )
            .bind(("language", language))
            .await?
            .take(0)?;
        Ok(interpreters)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Interpreter>> {
        let record = parse_record_id(TABLE, id)?;
        let interpreter: Option<Interpreter> = self.base.db().select(record).await?;
        Ok(interpreter)
    }

    pub async fn create(&self, interpreter: Interpreter) -> RepoResult<Interpreter> {
        let created: Option<Interpreter> =
            self.base.db().create(TABLE).content(interpreter).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create interpreter".to_string()))
    }

    pub async fn update(&self, id: &str, data: InterpreterUpdate) -> RepoResult<Interpreter> {
        let record = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record.clone()))
            .bind(("data", data))
            .await?;

        let interpreter: Option<Interpreter> = self.base.db().select(record).await?;
        interpreter.ok_or_else(|| RepoError::NotFound(format!("Interpreter {} not found", id)))
    }

    pub async fn deactivate(&self, id: &str) -> RepoResult<Interpreter> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET is_active = false RETURN AFTER")
            .bind(("record", record))
            .await?;
        let updated: Vec<Interpreter> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Interpreter {} not found", id)))
    }
}
