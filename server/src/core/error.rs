//! Server lifecycle errors
//!
//! Startup and shutdown failures. Request-level errors use
//! [`shared::AppError`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Bind error: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<surrealdb::Error> for ServerError {
    fn from(err: surrealdb::Error) -> Self {
        ServerError::Database(err.to_string())
    }
}

/// Result type alias for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
