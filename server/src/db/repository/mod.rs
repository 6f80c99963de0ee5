//! Repository module
//!
//! CRUD and domain queries per SurrealDB collection.

// Accounts
pub mod user;

// Profiles
pub mod client;
pub mod interpreter;

// Scheduling
pub mod assignment;
pub mod booking;

// Billing
pub mod client_invoice;
pub mod interpreter_invoice;
pub mod rate;
pub mod timesheet;

// Re-exports
pub use assignment::AssignmentRepository;
pub use booking::BookingRepository;
pub use client::ClientRepository;
pub use client_invoice::ClientInvoiceRepository;
pub use interpreter::InterpreterRepository;
pub use interpreter_invoice::InterpreterInvoiceRepository;
pub use rate::RateRepository;
pub use timesheet::{ApprovalFigures, TimesheetRepository};
pub use user::UserRepository;

use shared::{AppError, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Conditional write lost against a concurrent writer
    #[error("Version conflict: {0}")]
    VersionConflict(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::VersionConflict(msg) => {
                AppError::with_message(ErrorCode::BookingVersionConflict, msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a `"table:id"` string into a [`RecordId`], checking the table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let record: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID format: {}", id)))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected a {} id, got: {}",
            table, id
        )));
    }
    Ok(record)
}
