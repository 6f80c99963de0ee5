//! Timesheet model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type TimesheetId = RecordId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimesheetStatus {
    Submitted,
    Approved,
    Invoiced,
}

impl Default for TimesheetStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// Timesheet entity - an interpreter's claimed actual working time
///
/// Mutated once by admin approval, which freezes the computed figures;
/// immutable afterwards except for invoice links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timesheet {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TimesheetId>,

    #[serde(with = "serde_helpers::record_id")]
    pub booking: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub interpreter: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,

    /// Actual start/end as unix timestamp millis
    pub actual_start: i64,
    pub actual_end: i64,

    #[serde(default)]
    pub break_minutes: i64,

    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub admin_approved: bool,

    #[serde(default)]
    pub status: TimesheetStatus,

    // Figures frozen at approval time, stored as floats rounded to
    // 2 decimal places
    #[serde(default)]
    pub client_units: Option<f64>,
    #[serde(default)]
    pub client_amount: Option<f64>,
    #[serde(default)]
    pub interpreter_units: Option<f64>,
    #[serde(default)]
    pub interpreter_amount: Option<f64>,

    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub ready_for_client_invoice: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub ready_for_interpreter_invoice: bool,

    #[serde(default, with = "serde_helpers::option_record_id")]
    pub client_invoice: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub interpreter_invoice: Option<RecordId>,

    pub created_at: i64,
}

/// Submit timesheet payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TimesheetCreate {
    /// Booking id ("booking:x")
    pub booking: String,
    /// Actual start/end as unix timestamp millis
    pub actual_start: i64,
    pub actual_end: i64,
    #[validate(range(min = 0, max = 480))]
    #[serde(default)]
    pub break_minutes: i64,
}
