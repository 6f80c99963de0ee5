//! Unified error system for the LinguaLink platform
//!
//! - [`ErrorCode`]: stable error codes shared with API clients
//! - [`AppError`]: the application error type with codes, messages and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking errors
//! - 4xxx: Assignment / offer errors
//! - 5xxx: Timesheet errors
//! - 6xxx: Billing / invoice errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Error with the default message for its code
//! let err = AppError::new(ErrorCode::NotFound);
//!
//! // Error with a custom message and a detail entry
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "client_id");
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
