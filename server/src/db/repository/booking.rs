//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Booking, BookingStatus, BookingUpdate};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all bookings, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find bookings belonging to one client
    ///
    /// Record links are stored in string form, so filters bind the
    /// normalized `"table:id"` string.
    pub async fn find_by_client(&self, client_id: &str) -> RepoResult<Vec<Booking>> {
        let client = parse_record_id("client", client_id)?.to_string();
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE client = $client ORDER BY created_at DESC")
            .bind(("client", client))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find bookings confirmed for one interpreter
    pub async fn find_by_interpreter(&self, interpreter_id: &str) -> RepoResult<Vec<Booking>> {
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE interpreter = $interpreter ORDER BY created_at DESC",
            )
            .bind(("interpreter", interpreter))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Confirmed bookings of an interpreter on a date - the conflict scan input
    pub async fn find_confirmed_on_date(
        &self,
        interpreter_id: &str,
        date: NaiveDate,
    ) -> RepoResult<Vec<Booking>> {
        let interpreter = parse_record_id("interpreter", interpreter_id)?.to_string();
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE interpreter = $interpreter AND status = 'CONFIRMED' AND date = $date",
            )
            .bind(("interpreter", interpreter))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let record = parse_record_id(TABLE, id)?;
        let booking: Option<Booking> = self.base.db().select(record).await?;
        Ok(booking)
    }

    /// Create a new booking
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update booking details (not status; see [`transition`](Self::transition))
    pub async fn update_details(&self, id: &str, data: BookingUpdate) -> RepoResult<Booking> {
        let record = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record MERGE $data; UPDATE $record SET updated_at = $now;")
            .bind(("record", record.clone()))
            .bind(("data", data))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        let booking: Option<Booking> = self.base.db().select(record).await?;
        booking.ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Conditionally write a status transition
    ///
    /// The write only lands when the stored `version` still equals
    /// `expected_version`; a lost race surfaces as
    /// [`RepoError::VersionConflict`] instead of last-write-wins.
    pub async fn transition(
        &self,
        id: &str,
        expected_version: i64,
        new_status: BookingStatus,
        interpreter: Option<RecordId>,
    ) -> RepoResult<Booking> {
        let record = parse_record_id(TABLE, id)?;
        let interpreter = interpreter.map(|r| r.to_string());
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $record SET \
                     status = $status, \
                     interpreter = $interpreter ?? interpreter, \
                     version = version + 1, \
                     updated_at = $now \
                 WHERE version = $expected RETURN AFTER",
            )
            .bind(("record", record))
            .bind(("status", new_status))
            .bind(("interpreter", interpreter))
            .bind(("expected", expected_version))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        let updated: Vec<Booking> = result.take(0)?;
        updated.into_iter().next().ok_or_else(|| {
            RepoError::VersionConflict(format!(
                "Booking {} was modified concurrently (expected version {})",
                id, expected_version
            ))
        })
    }
}
