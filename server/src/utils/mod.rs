//! Utility module - shared helpers
//!
//! - [`AppError`] / [`AppResult`] - re-exported from `shared::error`
//! - [`logger`] - tracing setup
//! - [`validation`] - payload validation helpers

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
pub use shared::response::ApiResponse;
