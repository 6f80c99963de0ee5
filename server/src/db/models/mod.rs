//! Database models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Profiles
pub mod client;
pub mod interpreter;

// Scheduling
pub mod assignment;
pub mod booking;

// Billing
pub mod invoice;
pub mod rate;
pub mod timesheet;

// Re-exports
pub use assignment::{Assignment, AssignmentCreate, AssignmentId, AssignmentStatus, OfferActor};
pub use booking::{
    Booking, BookingCreate, BookingId, BookingStatus, BookingUpdate, Location, ServiceType,
};
pub use client::{Client, ClientCreate, ClientId, ClientUpdate};
pub use interpreter::{Interpreter, InterpreterCreate, InterpreterId, InterpreterUpdate};
pub use invoice::{
    ClientInvoice, ClientInvoiceId, ClientInvoiceLine, ClientInvoiceStatus,
    GenerateClientInvoiceRequest, GenerateClientInvoiceResult, InterpreterInvoice,
    InterpreterInvoiceId, InterpreterInvoiceLine, InterpreterInvoiceStatus,
    InterpreterInvoiceSubmit,
};
pub use rate::{Rate, RateId, RateType, RateUpsert};
pub use timesheet::{Timesheet, TimesheetCreate, TimesheetId, TimesheetStatus};
pub use user::{User, UserCreate, UserId, UserResponse, UserUpdate};
