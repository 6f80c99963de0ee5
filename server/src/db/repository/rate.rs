//! Rate Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Rate, RateType, RateUpsert, ServiceType};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "rate";

#[derive(Clone)]
pub struct RateRepository {
    base: BaseRepository,
}

impl RateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Rate>> {
        let rates: Vec<Rate> = self
            .base
            .db()
            .query("SELECT * FROM rate ORDER BY rate_type, service_type")
            .await?
            .take(0)?;
        Ok(rates)
    }

    /// Look up the rate for one side of one service type
    pub async fn find_by_key(
        &self,
        rate_type: RateType,
        service_type: ServiceType,
    ) -> RepoResult<Option<Rate>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM rate \
                 WHERE rate_type = $rate_type AND service_type = $service_type LIMIT 1",
            )
            .bind(("rate_type", rate_type))
            .bind(("service_type", service_type))
            .await?;
        let rates: Vec<Rate> = result.take(0)?;
        Ok(rates.into_iter().next())
    }

    /// Create or replace the rate for a (rate_type, service_type) key
    pub async fn upsert(&self, data: RateUpsert) -> RepoResult<Rate> {
        let mut result = self
            .base
            .db()
            .query(
                "DELETE rate WHERE rate_type = $data.rate_type \
                     AND service_type = $data.service_type; \
                 CREATE rate CONTENT $data;",
            )
            .bind(("data", data))
            .await?;
        let rates: Vec<Rate> = result.take(1)?;
        rates
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to upsert rate".to_string()))
    }

    /// Returns whether a rate actually existed
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("DELETE $record RETURN BEFORE")
            .bind(("record", record))
            .await?;
        let deleted: Vec<Rate> = result.take(0)?;
        Ok(!deleted.is_empty())
    }
}
