//! Assignment Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Assignment, AssignmentStatus, OfferActor};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "assignment";

#[derive(Clone)]
pub struct AssignmentRepository {
    base: BaseRepository,
}

impl AssignmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All assignments for one booking, newest offer first
    pub async fn find_by_booking(&self, booking_id: &str) -> RepoResult<Vec<Assignment>> {
        let booking = parse_record_id("booking", booking_id)?.to_string();
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query("SELECT * FROM assignment WHERE booking = $booking ORDER BY offered_at DESC")
            .bind(("booking", booking))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// All assignments offered to one interpreter
    pub async fn find_by_interpreter(&self, interpreter_id: &str) -> RepoResult<Vec<Assignment>> {
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                "SELECT * FROM assignment WHERE interpreter = $interpreter \
                 ORDER BY offered_at DESC",
            )
            .bind(("interpreter", interpreter))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// The open (still OFFERED) assignment for a (booking, interpreter)
    /// pair, if any
    pub async fn find_open_for_pair(
        &self,
        booking_id: &str,
        interpreter_id: &str,
    ) -> RepoResult<Option<Assignment>> {
        let booking = parse_record_id("booking", booking_id)?.to_string();
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM assignment \
                 WHERE booking = $booking AND interpreter = $interpreter \
                   AND status = 'OFFERED' LIMIT 1",
            )
            .bind(("booking", booking))
            .bind(("interpreter", interpreter))
            .await?;
        let assignments: Vec<Assignment> = result.take(0)?;
        Ok(assignments.into_iter().next())
    }

    /// All open offers for a booking (used when cancelling a booking)
    pub async fn find_open_by_booking(&self, booking_id: &str) -> RepoResult<Vec<Assignment>> {
        let booking = parse_record_id("booking", booking_id)?.to_string();
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query("SELECT * FROM assignment WHERE booking = $booking AND status = 'OFFERED'")
            .bind(("booking", booking))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// Find assignment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Assignment>> {
        let record = parse_record_id(TABLE, id)?;
        let assignment: Option<Assignment> = self.base.db().select(record).await?;
        Ok(assignment)
    }

    /// Append a new assignment
    pub async fn create(&self, assignment: Assignment) -> RepoResult<Assignment> {
        let created: Option<Assignment> = self.base.db().create(TABLE).content(assignment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create assignment".to_string()))
    }

    /// Resolve an offer: flip the status and stamp the response
    ///
    /// Only lands while the assignment is still OFFERED; a second
    /// response loses and surfaces as a conflict.
    pub async fn respond(
        &self,
        id: &str,
        status: AssignmentStatus,
        actor: OfferActor,
    ) -> RepoResult<Assignment> {
        let record = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $record SET \
                     status = $status, \
                     responded_at = $now, \
                     responded_by = $actor \
                 WHERE status = 'OFFERED' RETURN AFTER",
            )
            .bind(("record", record))
            .bind(("status", status))
            .bind(("actor", actor))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        let updated: Vec<Assignment> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Duplicate(format!("Offer {} already responded to", id)))
    }
}
