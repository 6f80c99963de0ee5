//! Booking assignment engine
//!
//! The booking/offer state machine. All status writes go through
//! [`transition::check_transition`] plus the version-guarded repository
//! write, so concurrent admins cannot silently overwrite each other.

pub mod conflict;
pub mod transition;

pub use conflict::find_conflict;
pub use transition::{allowed, check_transition};

use crate::db::models::{
    Assignment, AssignmentCreate, AssignmentStatus, Booking, BookingCreate, BookingStatus,
    OfferActor,
};
use crate::db::repository::{
    AssignmentRepository, BookingRepository, InterpreterRepository, RepoError, parse_record_id,
};
use crate::utils::validation::{parse_date, parse_time, validate_payload};
use chrono::{NaiveDate, NaiveTime};
use shared::{AppError, AppResult, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Booking lifecycle service
#[derive(Clone)]
pub struct BookingService {
    bookings: BookingRepository,
    assignments: AssignmentRepository,
    interpreters: InterpreterRepository,
}

impl BookingService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            bookings: BookingRepository::new(db.clone()),
            assignments: AssignmentRepository::new(db.clone()),
            interpreters: InterpreterRepository::new(db),
        }
    }

    pub async fn create_booking(&self, data: BookingCreate) -> AppResult<Booking> {
        validate_payload(&data)?;
        let client = parse_record_id("client", &data.client).map_err(AppError::from)?;
        let date = parse_date(&data.date)?;
        let start_time = parse_time(&data.start_time)?;
        let now = chrono::Utc::now().timestamp_millis();

        let booking = Booking {
            id: None,
            client,
            language_from: data.language_from,
            language_to: data.language_to,
            service_type: data.service_type,
            date,
            start_time,
            duration_minutes: data.duration_minutes,
            location: data.location,
            status: BookingStatus::Requested,
            interpreter: None,
            version: 0,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        };

        let created = self.bookings.create(booking).await?;
        tracing::info!(
            booking = %id_of(&created),
            client = %created.client,
            "Booking created"
        );
        Ok(created)
    }

    /// Offer a booking to an interpreter
    ///
    /// The first offer moves the booking REQUESTED -> OFFERED; further
    /// offers while OFFERED leave the booking untouched. A pair that
    /// already holds an open offer is rejected.
    pub async fn create_assignment(&self, data: AssignmentCreate) -> AppResult<Assignment> {
        let booking = self.get_booking(&data.booking).await?;
        let booking_id = id_of(&booking);

        match booking.status {
            BookingStatus::Requested | BookingStatus::Offered => {}
            BookingStatus::Cancelled => {
                return Err(AppError::conflict(
                    ErrorCode::BookingCancelled,
                    format!("Booking {} is cancelled", booking_id),
                ));
            }
            other => {
                return Err(AppError::conflict(
                    ErrorCode::InvalidBookingTransition,
                    format!("Booking {} cannot be offered while {}", booking_id, other.as_str()),
                ));
            }
        }

        let interpreter = self
            .interpreters
            .find_by_id(&data.interpreter)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Interpreter {}", data.interpreter)))?;
        if !interpreter.is_active {
            return Err(AppError::invalid(format!(
                "Interpreter {} is deactivated",
                data.interpreter
            )));
        }

        if self
            .assignments
            .find_open_for_pair(&booking_id, &data.interpreter)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                ErrorCode::OfferAlreadyOpen,
                format!(
                    "Interpreter {} already holds an open offer for {}",
                    data.interpreter, booking_id
                ),
            ));
        }

        let assignment = Assignment {
            id: None,
            booking: booking.id.clone().ok_or_else(|| AppError::internal("Booking missing id"))?,
            interpreter: parse_record_id("interpreter", &data.interpreter)
                .map_err(AppError::from)?,
            status: AssignmentStatus::Offered,
            offered_at: chrono::Utc::now().timestamp_millis(),
            responded_at: None,
            responded_by: None,
            booking_date: booking.date,
            booking_start_time: booking.start_time,
            booking_duration_minutes: booking.duration_minutes,
            booking_service_type: booking.service_type,
        };
        let created = self.assignments.create(assignment).await?;

        if booking.status == BookingStatus::Requested {
            check_transition(booking.status, BookingStatus::Offered)?;
            self.bookings
                .transition(&booking_id, booking.version, BookingStatus::Offered, None)
                .await?;
        }

        tracing::info!(
            booking = %booking_id,
            interpreter = %data.interpreter,
            "Offer created"
        );
        Ok(created)
    }

    /// Interpreter accepts an open offer, confirming the booking
    pub async fn accept_offer(&self, assignment_id: &str) -> AppResult<Booking> {
        let assignment = self.get_assignment(assignment_id).await?;
        if assignment.status != AssignmentStatus::Offered {
            return Err(AppError::conflict(
                ErrorCode::OfferAlreadyResolved,
                format!("Offer {} was already responded to", assignment_id),
            ));
        }

        let booking_id = assignment.booking.to_string();
        let booking = self.get_booking(&booking_id).await?;

        // A booking confirmed for someone else stays confirmed; the
        // original data model let a late accept steal it.
        if booking.status == BookingStatus::Confirmed {
            return Err(AppError::conflict(
                ErrorCode::BookingAlreadyConfirmed,
                format!("Booking {} is already confirmed", booking_id),
            ));
        }
        check_transition(booking.status, BookingStatus::Confirmed)?;

        // The guarded assignment write goes first: losing it against a
        // concurrent retract must leave the booking unconfirmed.
        self.respond(assignment_id, AssignmentStatus::Accepted, OfferActor::Interpreter)
            .await?;

        let confirmed = self
            .bookings
            .transition(
                &booking_id,
                booking.version,
                BookingStatus::Confirmed,
                Some(assignment.interpreter.clone()),
            )
            .await?;

        tracing::info!(
            booking = %booking_id,
            interpreter = %assignment.interpreter,
            "Offer accepted, booking confirmed"
        );
        Ok(confirmed)
    }

    /// Interpreter declines, or admin retracts, an open offer
    ///
    /// The booking stays OFFERED; re-offering is an explicit admin act.
    pub async fn decline_offer(
        &self,
        assignment_id: &str,
        actor: OfferActor,
    ) -> AppResult<Assignment> {
        let declined = self
            .respond(assignment_id, AssignmentStatus::Declined, actor)
            .await?;
        tracing::info!(
            assignment = %assignment_id,
            actor = ?actor,
            "Offer declined"
        );
        Ok(declined)
    }

    /// Admin override: confirm an interpreter directly, skipping the
    /// offer round
    pub async fn assign_interpreter(
        &self,
        booking_id: &str,
        interpreter_id: &str,
    ) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.status == BookingStatus::Confirmed {
            return Err(AppError::conflict(
                ErrorCode::BookingAlreadyConfirmed,
                format!("Booking {} is already confirmed", booking_id),
            ));
        }
        check_transition(booking.status, BookingStatus::Confirmed)?;

        let interpreter = self
            .interpreters
            .find_by_id(interpreter_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Interpreter {}", interpreter_id)))?;
        if !interpreter.is_active {
            return Err(AppError::invalid(format!(
                "Interpreter {} is deactivated",
                interpreter_id
            )));
        }

        let confirmed = self
            .bookings
            .transition(
                booking_id,
                booking.version,
                BookingStatus::Confirmed,
                Some(parse_record_id("interpreter", interpreter_id).map_err(AppError::from)?),
            )
            .await?;

        tracing::info!(
            booking = %booking_id,
            interpreter = %interpreter_id,
            "Interpreter assigned directly"
        );
        Ok(confirmed)
    }

    /// Cancel a booking that has not been confirmed yet
    ///
    /// Open sibling offers are retracted with actor ADMIN.
    pub async fn cancel_booking(&self, booking_id: &str) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        check_transition(booking.status, BookingStatus::Cancelled)?;

        let cancelled = self
            .bookings
            .transition(booking_id, booking.version, BookingStatus::Cancelled, None)
            .await?;

        for open in self.assignments.find_open_by_booking(booking_id).await? {
            if let Some(id) = &open.id {
                self.respond(&id.to_string(), AssignmentStatus::Declined, OfferActor::Admin)
                    .await?;
            }
        }

        tracing::info!(booking = %booking_id, "Booking cancelled");
        Ok(cancelled)
    }

    /// Confirmed -> completed, driven by timesheet submission
    pub async fn complete_booking(&self, booking_id: &str) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        check_transition(booking.status, BookingStatus::Completed)?;
        let completed = self
            .bookings
            .transition(booking_id, booking.version, BookingStatus::Completed, None)
            .await?;
        Ok(completed)
    }

    /// Advisory scan: does the candidate slot overlap a CONFIRMED
    /// booking of this interpreter on the same date?
    pub async fn check_schedule_conflict(
        &self,
        interpreter_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: i64,
        exclude_booking_id: Option<&str>,
    ) -> AppResult<Option<Booking>> {
        let confirmed = self
            .bookings
            .find_confirmed_on_date(interpreter_id, date)
            .await?;
        Ok(
            conflict::find_conflict(&confirmed, start_time, duration_minutes, exclude_booking_id)
                .cloned(),
        )
    }

    async fn get_booking(&self, id: &str) -> AppResult<Booking> {
        self.bookings.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::BookingNotFound, format!("Booking {} not found", id))
        })
    }

    async fn get_assignment(&self, id: &str) -> AppResult<Assignment> {
        self.assignments.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::AssignmentNotFound,
                format!("Assignment {} not found", id),
            )
        })
    }

    async fn respond(
        &self,
        assignment_id: &str,
        status: AssignmentStatus,
        actor: OfferActor,
    ) -> AppResult<Assignment> {
        self.assignments
            .respond(assignment_id, status, actor)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate(msg) => {
                    AppError::conflict(ErrorCode::OfferAlreadyResolved, msg)
                }
                other => other.into(),
            })
    }

    pub fn repo(&self) -> &BookingRepository {
        &self.bookings
    }

    pub fn assignments(&self) -> &AssignmentRepository {
        &self.assignments
    }
}

fn id_of(booking: &Booking) -> String {
    booking
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default()
}
