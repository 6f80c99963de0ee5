//! Shared contract types for the LinguaLink booking platform
//!
//! Everything a client of the portal server needs to speak its API:
//! the unified error system, the response envelope, and role definitions.

pub mod error;
pub mod response;
pub mod types;

pub use error::{AppError, AppResult, ErrorCode};
pub use response::ApiResponse;
pub use types::Role;
