//! Assignment ("offer") model

use super::serde_helpers;
use super::{BookingId, ServiceType};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type AssignmentId = RecordId;

/// Offer status, independent per (booking, interpreter) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Offered,
    Accepted,
    Declined,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        Self::Offered
    }
}

/// Who resolved an offer
///
/// An admin retracting an offer and an interpreter declining it are the
/// same status flip; this field keeps them distinguishable afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferActor {
    Interpreter,
    Admin,
}

/// Assignment entity - one interpreter offered one booking
///
/// Several assignments can exist concurrently for a booking; at most one
/// ends up ACCEPTED (enforced by the booking transition, not here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AssignmentId>,

    #[serde(with = "serde_helpers::record_id")]
    pub booking: BookingId,

    #[serde(with = "serde_helpers::record_id")]
    pub interpreter: RecordId,

    #[serde(default)]
    pub status: AssignmentStatus,

    /// Unix timestamp millis
    pub offered_at: i64,
    pub responded_at: Option<i64>,
    pub responded_by: Option<OfferActor>,

    // Booking snapshot at offer time, shown in the interpreter app
    // without a second lookup
    pub booking_date: NaiveDate,
    pub booking_start_time: NaiveTime,
    pub booking_duration_minutes: i64,
    pub booking_service_type: ServiceType,
}

/// Create assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    /// Booking id ("booking:x")
    pub booking: String,
    /// Interpreter id ("interpreter:x")
    pub interpreter: String,
}
