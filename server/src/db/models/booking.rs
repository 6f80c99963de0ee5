//! Booking model

use super::serde_helpers;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type BookingId = RecordId;

/// Booking lifecycle status
///
/// Transitions are driven exclusively through
/// [`bookings::transition`](crate::bookings::transition); nothing else
/// writes this field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Requested,
    Offered,
    Confirmed,
    Completed,
    Cancelled,
    Invoiced,
    Paid,
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Requested
    }
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Offered => "OFFERED",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Invoiced => "INVOICED",
            Self::Paid => "PAID",
        }
    }
}

/// Interpreting service type, the rate table key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Onsite,
    VideoCall,
    Telephone,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onsite => "ONSITE",
            Self::VideoCall => "VIDEO_CALL",
            Self::Telephone => "TELEPHONE",
        }
    }
}

/// Where the interpreting takes place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Onsite { address: String },
    Remote { link: String },
}

/// Booking entity
///
/// Never hard-deleted: cancellation is a status, not removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,

    /// Requesting client
    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,

    /// Language pair
    pub language_from: String,
    pub language_to: String,

    pub service_type: ServiceType,

    /// Scheduled date (local to the client)
    pub date: NaiveDate,
    /// Scheduled start time
    pub start_time: NaiveTime,
    /// Scheduled duration in minutes
    pub duration_minutes: i64,

    pub location: Location,

    #[serde(default)]
    pub status: BookingStatus,

    /// Confirmed interpreter, set when the booking is confirmed
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub interpreter: Option<RecordId>,

    /// Optimistic-concurrency counter, bumped on every status write
    #[serde(default)]
    pub version: i64,

    pub notes: Option<String>,

    /// Unix timestamp millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    /// Requesting client id ("client:x"); for client-portal callers this
    /// must match the caller's own profile
    pub client: String,
    #[validate(length(min = 2, max = 64))]
    pub language_from: String,
    #[validate(length(min = 2, max = 64))]
    pub language_to: String,
    pub service_type: ServiceType,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub start_time: String,
    #[validate(range(min = 15, max = 1440))]
    pub duration_minutes: i64,
    pub location: Location,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Update booking payload (details only; status changes go through the
/// transition endpoints)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 64))]
    pub language_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 64))]
    pub language_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 15, max = 1440))]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
