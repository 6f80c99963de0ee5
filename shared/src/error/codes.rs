//! Unified error codes for the LinguaLink platform
//!
//! Error codes are shared between the portal server and its clients
//! (admin console, client portal, interpreter app). Codes are organized
//! by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking errors
//! - 4xxx: Assignment / offer errors
//! - 5xxx: Timesheet errors
//! - 6xxx: Billing / invoice errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values for efficient serialization and
/// cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Caller does not own the requested resource
    NotResourceOwner = 2003,

    // ==================== 3xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 3001,
    /// Booking status does not allow the requested transition
    InvalidBookingTransition = 3002,
    /// Booking was modified concurrently (version mismatch)
    BookingVersionConflict = 3003,
    /// Booking is already confirmed for another interpreter
    BookingAlreadyConfirmed = 3004,
    /// Booking is cancelled
    BookingCancelled = 3005,

    // ==================== 4xxx: Assignment ====================
    /// Assignment not found
    AssignmentNotFound = 4001,
    /// An open offer already exists for this interpreter and booking
    OfferAlreadyOpen = 4002,
    /// Assignment has already been responded to
    OfferAlreadyResolved = 4003,

    // ==================== 5xxx: Timesheet ====================
    /// Timesheet not found
    TimesheetNotFound = 5001,
    /// Timesheet already approved (amounts frozen)
    TimesheetAlreadyApproved = 5002,
    /// Timesheet already linked to an invoice
    TimesheetAlreadyInvoiced = 5003,
    /// Actual end precedes actual start
    InvalidTimesheetPeriod = 5004,

    // ==================== 6xxx: Billing ====================
    /// Invoice not found
    InvoiceNotFound = 6001,
    /// Rate not found for the requested service type
    RateNotFound = 6002,
    /// Invoice status does not allow the requested change
    InvalidInvoiceTransition = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account is disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::NotResourceOwner => "Not the owner of this resource",

            Self::BookingNotFound => "Booking not found",
            Self::InvalidBookingTransition => "Booking status does not allow this transition",
            Self::BookingVersionConflict => "Booking was modified concurrently",
            Self::BookingAlreadyConfirmed => "Booking is already confirmed for another interpreter",
            Self::BookingCancelled => "Booking is cancelled",

            Self::AssignmentNotFound => "Assignment not found",
            Self::OfferAlreadyOpen => "An open offer already exists for this pair",
            Self::OfferAlreadyResolved => "Offer has already been responded to",

            Self::TimesheetNotFound => "Timesheet not found",
            Self::TimesheetAlreadyApproved => "Timesheet is already approved",
            Self::TimesheetAlreadyInvoiced => "Timesheet is already invoiced",
            Self::InvalidTimesheetPeriod => "Actual end must be after actual start",

            Self::InvoiceNotFound => "Invoice not found",
            Self::RateNotFound => "Rate not found",
            Self::InvalidInvoiceTransition => "Invoice status does not allow this change",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,
            2003 => Self::NotResourceOwner,

            3001 => Self::BookingNotFound,
            3002 => Self::InvalidBookingTransition,
            3003 => Self::BookingVersionConflict,
            3004 => Self::BookingAlreadyConfirmed,
            3005 => Self::BookingCancelled,

            4001 => Self::AssignmentNotFound,
            4002 => Self::OfferAlreadyOpen,
            4003 => Self::OfferAlreadyResolved,

            5001 => Self::TimesheetNotFound,
            5002 => Self::TimesheetAlreadyApproved,
            5003 => Self::TimesheetAlreadyInvoiced,
            5004 => Self::InvalidTimesheetPeriod,

            6001 => Self::InvoiceNotFound,
            6002 => Self::RateNotFound,
            6003 => Self::InvalidInvoiceTransition,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
