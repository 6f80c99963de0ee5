//! Invoice models
//!
//! Client invoices are derived by the billing rollup; interpreter
//! invoices are self-billed (external reference and total supplied by
//! the interpreter), with the system linking the claimed timesheets.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type ClientInvoiceId = RecordId;
pub type InterpreterInvoiceId = RecordId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientInvoiceStatus {
    Draft,
    Sent,
    Paid,
}

impl Default for ClientInvoiceStatus {
    fn default() -> Self {
        Self::Draft
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpreterInvoiceStatus {
    Submitted,
    Approved,
    Rejected,
}

impl Default for InterpreterInvoiceStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// Client invoice - one billable document rolled up from many timesheets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInvoice {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ClientInvoiceId>,

    /// Generated reference, `INV-<timestamp suffix>`
    pub reference: String,

    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,

    /// Billing period bounds, unix timestamp millis
    pub period_start: i64,
    pub period_end: i64,

    pub issue_date: i64,
    /// issue_date + payment terms
    pub due_date: i64,

    pub total_amount: f64,

    #[serde(default)]
    pub status: ClientInvoiceStatus,
}

/// One line per rolled-up timesheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInvoiceLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,

    #[serde(with = "serde_helpers::record_id")]
    pub invoice: ClientInvoiceId,

    #[serde(with = "serde_helpers::record_id")]
    pub timesheet: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub booking: RecordId,

    /// Embeds booking id and date
    pub description: String,

    pub units: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Interpreter invoice - a self-billed payment claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterInvoice {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<InterpreterInvoiceId>,

    /// Externally supplied reference (the interpreter's own numbering)
    pub reference: String,

    #[serde(with = "serde_helpers::record_id")]
    pub interpreter: RecordId,

    pub total_amount: f64,

    #[serde(default)]
    pub status: InterpreterInvoiceStatus,

    pub submitted_at: i64,
    pub resolved_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterInvoiceLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,

    #[serde(with = "serde_helpers::record_id")]
    pub invoice: InterpreterInvoiceId,

    #[serde(with = "serde_helpers::record_id")]
    pub timesheet: RecordId,

    pub amount: f64,
}

/// Admin request to roll up a client's approved timesheets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateClientInvoiceRequest {
    /// Client id ("client:x")
    pub client_id: String,
    /// YYYY-MM-DD, inclusive
    pub period_start: String,
    pub period_end: String,
}

/// Rollup outcome; `invoice_id = None` means no eligible timesheets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateClientInvoiceResult {
    pub invoice_id: Option<String>,
    pub count: usize,
    pub total: f64,
}

/// Interpreter self-bill submission payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterpreterInvoiceSubmit {
    #[validate(length(min = 1, max = 200))]
    pub reference: String,
    pub total_amount: f64,
    /// Timesheet ids ("timesheet:x") claimed by this invoice
    #[validate(length(min = 1))]
    pub timesheet_ids: Vec<String>,
}
