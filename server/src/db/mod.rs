//! Database module
//!
//! Embedded SurrealDB storage: one repository per collection, models in
//! [`models`].

pub mod models;
pub mod repository;
