//! Client Profile Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Client, ClientUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "client";

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client ORDER BY name")
            .await?
            .take(0)?;
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let record = parse_record_id(TABLE, id)?;
        let client: Option<Client> = self.base.db().select(record).await?;
        Ok(client)
    }

    pub async fn create(&self, client: Client) -> RepoResult<Client> {
        let created: Option<Client> = self.base.db().create(TABLE).content(client).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    pub async fn update(&self, id: &str, data: ClientUpdate) -> RepoResult<Client> {
        let record = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record MERGE $data")
            .bind(("record", record.clone()))
            .bind(("data", data))
            .await?;

        let client: Option<Client> = self.base.db().select(record).await?;
        client.ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }

    /// Soft delete: profiles referenced by history are deactivated, not
    /// removed
    pub async fn deactivate(&self, id: &str) -> RepoResult<Client> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET is_active = false RETURN AFTER")
            .bind(("record", record))
            .await?;
        let updated: Vec<Client> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }
}
